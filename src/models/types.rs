use chrono::{DateTime, Local};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use strum_macros::Display as StrumDisplay;

/// Идентификатор чата Telegram (может быть отрицательным для групп)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, From, Into, Display, FromStr)]
pub struct ChatId(i64);

impl ChatId {
    pub fn get(self) -> i64 {
        self.0
    }
}

/// SHA-256 of the normalised page text, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, From, Into, Display, AsRef)]
#[from(String, &str)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex chars, enough to tell snapshots apart in logs.
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

/// Last-seen state of the monitored page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub hash: ContentHash,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub previous: Snapshot,
    pub current: Snapshot,
}

impl Change {
    pub fn summary(&self) -> String {
        format!(
            "Content changed. Length: {} → {} characters.",
            self.previous.length, self.current.length
        )
    }
}

/// Result of a single fetch/detect/notify pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "snake_case")]
pub enum CycleOutcome {
    Baseline,
    Unchanged,
    Notified,
    NotifyFailed,
    FetchFailed,
}

/// Counters kept for the periodic status report.
#[derive(Debug, Clone)]
pub struct MonitorStats {
    pub checks: u64,
    pub changes: u64,
    pub fetch_failures: u64,
    pub notify_failures: u64,
    pub started_at: DateTime<Local>,
    pub last_checked: Option<DateTime<Local>>,
}

impl Default for MonitorStats {
    fn default() -> Self {
        Self {
            checks: 0,
            changes: 0,
            fetch_failures: 0,
            notify_failures: 0,
            started_at: Local::now(),
            last_checked: None,
        }
    }
}

impl MonitorStats {
    pub fn record(&mut self, outcome: CycleOutcome) {
        self.checks += 1;
        match outcome {
            CycleOutcome::FetchFailed => self.fetch_failures += 1,
            CycleOutcome::Notified => self.changes += 1,
            CycleOutcome::NotifyFailed => {
                self.changes += 1;
                self.notify_failures += 1;
            }
            CycleOutcome::Baseline | CycleOutcome::Unchanged => {}
        }
        if outcome != CycleOutcome::FetchFailed {
            self.last_checked = Some(Local::now());
        }
    }
}
