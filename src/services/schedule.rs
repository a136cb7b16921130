use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::models::config::AppConfig;

/// Cadence of the monitor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub check_interval: Duration,
    pub report_interval: Option<Duration>,
}

impl Schedule {
    pub fn new(check_interval: Duration) -> Self {
        Self {
            check_interval,
            report_interval: None,
        }
    }

    pub fn with_report_interval(mut self, report_interval: Option<Duration>) -> Self {
        self.report_interval = report_interval;
        self
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.poll_interval).with_report_interval(config.report_interval)
    }

    /// Fires immediately, then every `check_interval`. A slow cycle pushes the
    /// next tick back instead of firing a burst.
    pub fn check_ticker(&self) -> Interval {
        let mut ticker = interval(self.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }

    /// First report comes one full interval after startup.
    pub fn report_ticker(&self) -> Option<Interval> {
        self.report_interval.map(|every| {
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn check_ticker_fires_immediately_then_every_interval() {
        let schedule = Schedule::new(Duration::from_secs(60));
        let mut ticker = schedule.check_ticker();
        let start = Instant::now();

        ticker.tick().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        ticker.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(60));
        ticker.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn report_ticker_waits_a_full_interval() {
        let schedule = Schedule::new(Duration::from_secs(60))
            .with_report_interval(Some(Duration::from_secs(3600)));
        let start = Instant::now();

        let mut ticker = schedule.report_ticker().unwrap();
        ticker.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(3600));

        assert!(Schedule::new(Duration::from_secs(1)).report_ticker().is_none());
    }
}
