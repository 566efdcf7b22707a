//! Structured merge events for observers

use crate::policy::MergeAction;
use appforge_files::CanonicalPath;
use serde::Serialize;
use tokio::sync::mpsc;

/// Events emitted while a baseline loads and merges run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MergeEvent {
    /// Baseline installed
    BaselineLoaded {
        /// File count
        files: usize,
    },
    /// Policy decision for one incoming record
    RecordResolved {
        /// Record path
        path: CanonicalPath,
        /// Resolved action
        action: MergeAction,
        /// Rule reason
        reason: &'static str,
    },
    /// Structured manifest merge failed, whole-file replace used instead
    ManifestFallback {
        /// Manifest path
        path: CanonicalPath,
        /// Merge error text
        error: String,
    },
    /// Merge applied
    MergeCompleted {
        /// Added count
        added: usize,
        /// Replaced count
        replaced: usize,
        /// Kept count
        kept: usize,
    },
    /// Merge rejected, working set untouched
    IntegrityViolation {
        /// Lost baseline paths
        lost: Vec<CanonicalPath>,
    },
}

/// Optional event channel; a closed receiver is ignored
#[derive(Debug, Clone, Default)]
pub struct EventSink(Option<mpsc::UnboundedSender<MergeEvent>>);

impl EventSink {
    /// Sink that drops every event
    #[inline]
    #[must_use]
    pub const fn disabled() -> Self {
        Self(None)
    }

    /// Sink forwarding to `sender`
    #[inline]
    #[must_use]
    pub const fn new(sender: mpsc::UnboundedSender<MergeEvent>) -> Self {
        Self(Some(sender))
    }

    /// Sink plus a fresh receiver
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<MergeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Forward one event
    pub fn emit(&self, event: MergeEvent) {
        if let Some(tx) = &self.0 {
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_a_tag() {
        let json = serde_json::to_value(MergeEvent::BaselineLoaded { files: 3 }).unwrap();
        assert_eq!(json, serde_json::json!({"event": "baseline_loaded", "files": 3}));
    }

    #[test]
    fn closed_receivers_are_ignored() {
        let (sink, rx) = EventSink::channel();
        drop(rx);
        sink.emit(MergeEvent::BaselineLoaded { files: 0 });
        EventSink::disabled().emit(MergeEvent::BaselineLoaded { files: 0 });
    }

    #[test]
    fn events_arrive_in_order() {
        let (sink, mut rx) = EventSink::channel();
        sink.emit(MergeEvent::BaselineLoaded { files: 1 });
        sink.emit(MergeEvent::MergeCompleted {
            added: 1,
            replaced: 0,
            kept: 0,
        });
        assert_eq!(rx.try_recv().unwrap(), MergeEvent::BaselineLoaded { files: 1 });
        assert!(matches!(rx.try_recv().unwrap(), MergeEvent::MergeCompleted { added: 1, .. }));
    }
}
