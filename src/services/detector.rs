use tracing::debug;

use crate::models::types::{Change, Snapshot};
use crate::services::content::{clean_content, content_hash};

/// What a single observation of the page means relative to the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// First fetch after startup. Never reported as a change.
    Baseline(Snapshot),
    Unchanged,
    Changed(Change),
}

/// Holds the last-seen snapshot for the lifetime of the process.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    snapshot: Option<Snapshot>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Compares `body` with the stored snapshot and replaces it on change.
    pub fn observe(&mut self, body: &str) -> Observation {
        let text = clean_content(body);
        let current = Snapshot {
            hash: content_hash(&text),
            length: text.chars().count(),
        };

        match self.snapshot.replace(current.clone()) {
            None => Observation::Baseline(current),
            Some(previous) if previous.hash == current.hash => {
                debug!(hash = %current.hash.short(), "content unchanged");
                Observation::Unchanged
            }
            Some(previous) => Observation::Changed(Change { previous, current }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_is_baseline() {
        let mut detector = ChangeDetector::new();
        match detector.observe("<html>Hello</html>") {
            Observation::Baseline(snapshot) => assert_eq!(snapshot.length, 5),
            other => panic!("expected baseline, got {other:?}"),
        }
        assert!(detector.snapshot().is_some());
    }

    #[test]
    fn equal_content_is_unchanged() {
        let mut detector = ChangeDetector::new();
        detector.observe("<p>Hello</p>");
        assert_eq!(detector.observe("<p>Hello</p>"), Observation::Unchanged);
        // разметка другая, текст тот же
        assert_eq!(
            detector.observe("<div><script>t=2</script><p> Hello </p></div>"),
            Observation::Unchanged
        );
    }

    #[test]
    fn differing_content_is_a_change_and_becomes_the_new_snapshot() {
        let mut detector = ChangeDetector::new();
        detector.observe("<html>Hello</html>");

        let change = match detector.observe("<html>Hello Changed</html>") {
            Observation::Changed(change) => change,
            other => panic!("expected change, got {other:?}"),
        };
        assert_eq!(change.previous.length, 5);
        assert_eq!(change.current.length, 13);
        assert_ne!(change.previous.hash, change.current.hash);
        assert_eq!(detector.snapshot(), Some(&change.current));

        // the same new content is not reported twice
        assert_eq!(detector.observe("<html>Hello Changed</html>"), Observation::Unchanged);
    }
}
