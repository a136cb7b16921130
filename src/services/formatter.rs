use chrono::{DateTime, Local};
use tera::{Context, Tera};
use url::Url;

use crate::error::{ConfigError, NotifyError};
use crate::models::types::{Change, MonitorStats};

pub const DEFAULT_CHANGE_TEMPLATE: &str = "📢 Page changed: {{ url }}\n\n{{ summary }}";

const CHANGE_TPL: &str = "change";
const REPORT_TPL: &str = "report";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const REPORT_TEMPLATE: &str = "📊 Page monitor report

✅ Monitor is alive and running.
URL: {{ url }}
Checks: {{ checks }}
Changes detected: {{ changes }}
Fetch failures: {{ fetch_failures }}
Notification failures: {{ notify_failures }}
Last successful check: {{ last_checked }}
Running since: {{ started_at }}
Time: {{ now }}";

/// Renders outgoing messages from Tera templates.
///
/// The change template is user-configurable; it sees `url`, `summary`,
/// `previous_length`, `current_length` and `checked_at`.
pub struct MessageFormatter {
    tera: Tera,
}

impl MessageFormatter {
    /// Compiles the templates up front so a broken `MESSAGE_TEMPLATE` fails at startup.
    pub fn new(change_template: Option<&str>) -> Result<Self, ConfigError> {
        let mut tera = Tera::default();
        tera.add_raw_template(CHANGE_TPL, change_template.unwrap_or(DEFAULT_CHANGE_TEMPLATE))?;
        tera.add_raw_template(REPORT_TPL, REPORT_TEMPLATE)?;
        Ok(Self { tera })
    }

    pub fn change_message(&self, url: &Url, change: &Change) -> Result<String, NotifyError> {
        let mut ctx = Context::new();
        ctx.insert("url", url.as_str());
        ctx.insert("summary", &change.summary());
        ctx.insert("previous_length", &change.previous.length);
        ctx.insert("current_length", &change.current.length);
        ctx.insert("checked_at", &format_time(Local::now()));
        Ok(self.tera.render(CHANGE_TPL, &ctx)?)
    }

    pub fn report_message(&self, url: &Url, stats: &MonitorStats) -> Result<String, NotifyError> {
        let mut ctx = Context::new();
        ctx.insert("url", url.as_str());
        ctx.insert("checks", &stats.checks);
        ctx.insert("changes", &stats.changes);
        ctx.insert("fetch_failures", &stats.fetch_failures);
        ctx.insert("notify_failures", &stats.notify_failures);
        ctx.insert(
            "last_checked",
            &stats.last_checked.map(format_time).unwrap_or_else(|| "never".to_string()),
        );
        ctx.insert("started_at", &format_time(stats.started_at));
        ctx.insert("now", &format_time(Local::now()));
        Ok(self.tera.render(REPORT_TPL, &ctx)?)
    }

    /// Sent once after the chat id is discovered.
    pub fn started_message(&self, url: &Url) -> String {
        format!("✅ Chat linked. Monitoring started for {url}")
    }
}

fn format_time(time: DateTime<Local>) -> String {
    time.format(TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::{CycleOutcome, Snapshot};
    use pretty_assertions::assert_eq;

    fn change() -> Change {
        Change {
            previous: Snapshot { hash: "a".into(), length: 5 },
            current: Snapshot { hash: "b".into(), length: 13 },
        }
    }

    fn url() -> Url {
        Url::parse("https://example.com/news").unwrap()
    }

    #[test]
    fn default_change_message() {
        let formatter = MessageFormatter::new(None).unwrap();
        assert_eq!(
            formatter.change_message(&url(), &change()).unwrap(),
            "📢 Page changed: https://example.com/news\n\nContent changed. Length: 5 → 13 characters."
        );
    }

    #[test]
    fn custom_change_template() {
        let formatter =
            MessageFormatter::new(Some("{{ url }} grew from {{ previous_length }} to {{ current_length }}")).unwrap();
        assert_eq!(
            formatter.change_message(&url(), &change()).unwrap(),
            "https://example.com/news grew from 5 to 13"
        );
    }

    #[test]
    fn broken_template_is_a_config_error() {
        let err = MessageFormatter::new(Some("{{ url ")).err().unwrap();
        assert!(matches!(err, ConfigError::Template(_)));
    }

    #[test]
    fn report_lists_counters() {
        let formatter = MessageFormatter::new(None).unwrap();
        let mut stats = MonitorStats::default();
        stats.record(CycleOutcome::Baseline);
        stats.record(CycleOutcome::Notified);
        stats.record(CycleOutcome::FetchFailed);

        let report = formatter.report_message(&url(), &stats).unwrap();
        assert!(report.starts_with("📊 Page monitor report"));
        assert!(report.contains("URL: https://example.com/news"));
        assert!(report.contains("Checks: 3"));
        assert!(report.contains("Changes detected: 1"));
        assert!(report.contains("Fetch failures: 1"));
        assert!(report.contains("Notification failures: 0"));
    }
}
