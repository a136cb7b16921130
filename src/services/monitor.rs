use std::sync::Arc;

use bon::Builder;
use tokio::time::Interval;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::NotifyError;
use crate::models::types::{CycleOutcome, MonitorStats};
use crate::services::detector::{ChangeDetector, Observation};
use crate::services::formatter::MessageFormatter;
use crate::services::schedule::Schedule;
use crate::traits::notifier::Notifier;
use crate::traits::page_fetcher::PageFetcher;

/// Watches one URL: fetch, compare with the last snapshot, notify on change.
#[derive(Builder)]
pub struct Monitor {
    target_url: Url,
    fetcher: Arc<dyn PageFetcher>,
    notifier: Arc<dyn Notifier>,
    formatter: Arc<MessageFormatter>,
    #[builder(default)]
    detector: ChangeDetector,
    #[builder(default)]
    stats: MonitorStats,
}

impl Monitor {
    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }

    /// One pass of the loop. Never fails: fetch and notify errors are logged
    /// and reflected in the returned outcome.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let outcome = self.check().await;
        self.stats.record(outcome);
        debug!(%outcome, checks = self.stats.checks, "cycle finished");
        outcome
    }

    async fn check(&mut self) -> CycleOutcome {
        let body = match self.fetcher.fetch(&self.target_url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "fetch failed, retrying next cycle");
                return CycleOutcome::FetchFailed;
            }
        };

        match self.detector.observe(&body) {
            Observation::Baseline(snapshot) => {
                info!(
                    url = %self.target_url,
                    hash = %snapshot.hash.short(),
                    length = snapshot.length,
                    "initial check, monitoring started"
                );
                CycleOutcome::Baseline
            }
            Observation::Unchanged => CycleOutcome::Unchanged,
            Observation::Changed(change) => {
                info!(
                    url = %self.target_url,
                    from = %change.previous.hash.short(),
                    to = %change.current.hash.short(),
                    "change detected"
                );
                let sent = match self.formatter.change_message(&self.target_url, &change) {
                    Ok(text) => self.notifier.notify(&text).await,
                    Err(e) => Err(e),
                };
                match sent {
                    Ok(()) => {
                        info!(notifier = self.notifier.name(), "change notification sent");
                        CycleOutcome::Notified
                    }
                    Err(e) => {
                        error!(notifier = self.notifier.name(), error = %e, "failed to send change notification");
                        CycleOutcome::NotifyFailed
                    }
                }
            }
        }
    }

    /// Sends the status report; failures are logged and returned.
    pub async fn send_report(&self) -> Result<(), NotifyError> {
        let text = self.formatter.report_message(&self.target_url, &self.stats)?;
        let result = self.notifier.notify(&text).await;
        match &result {
            Ok(()) => info!(checks = self.stats.checks, "status report sent"),
            Err(e) => error!(error = %e, "failed to send status report"),
        }
        result
    }

    /// Runs forever on `schedule`. Cancelled from outside on shutdown.
    pub async fn run(&mut self, schedule: &Schedule) {
        info!(
            url = %self.target_url,
            interval_secs = schedule.check_interval.as_secs(),
            "monitor started"
        );
        let mut checks = schedule.check_ticker();
        let mut reports = schedule.report_ticker();

        loop {
            tokio::select! {
                _ = checks.tick() => {
                    self.run_cycle().await;
                }
                _ = next_tick(&mut reports) => {
                    let _ = self.send_report().await;
                }
            }
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
