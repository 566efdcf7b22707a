//! Per-merge summary returned to the caller

use crate::policy::MergeStrategy;
use appforge_files::CanonicalPath;
use serde::Serialize;

/// What actually happened to one incoming record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Path was new
    Added,
    /// Incoming content overwrote the existing file
    Replaced,
    /// Working set left as it was: existing content retained, or an absent path kept out
    Kept,
    /// Manifest merged field by field
    Merged,
    /// Manifest merge failed and the incoming file replaced it whole
    MergeFallback,
}

/// Audit row for one incoming record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordDecision {
    /// Record path
    pub path: CanonicalPath,
    /// Resolved policy decision
    pub strategy: MergeStrategy,
    /// Applied outcome
    pub outcome: Outcome,
}

/// Result of one successful merge
///
/// Every incoming path lands in exactly one of `added`, `replaced` or
/// `kept`. Manifest merges count as replaced and are also listed in
/// `manifest_merged` or `manifest_fallbacks`.
///
/// Only accepted merges produce a report; lost baseline paths are carried by
/// [`MergeError::IntegrityViolation`](crate::MergeError::IntegrityViolation).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Paths new to the working set
    pub added: Vec<CanonicalPath>,
    /// Paths whose content changed
    pub replaced: Vec<CanonicalPath>,
    /// Paths the merge left untouched
    pub kept: Vec<CanonicalPath>,
    /// Manifests merged field by field
    pub manifest_merged: Vec<CanonicalPath>,
    /// Manifests replaced after a failed structured merge
    pub manifest_fallbacks: Vec<CanonicalPath>,
    /// Decisions in record order
    pub decisions: Vec<RecordDecision>,
}

impl MergeReport {
    /// Create empty report
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, path: CanonicalPath, strategy: MergeStrategy, outcome: Outcome) {
        match outcome {
            Outcome::Added => self.added.push(path.clone()),
            Outcome::Replaced => self.replaced.push(path.clone()),
            Outcome::Kept => self.kept.push(path.clone()),
            Outcome::Merged => {
                self.replaced.push(path.clone());
                self.manifest_merged.push(path.clone());
            }
            Outcome::MergeFallback => {
                self.replaced.push(path.clone());
                self.manifest_fallbacks.push(path.clone());
            }
        }
        self.decisions.push(RecordDecision {
            path,
            strategy,
            outcome,
        });
    }

    /// Number of incoming records processed
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.added.len() + self.replaced.len() + self.kept.len()
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} added, {} replaced, {} kept",
            self.added.len(),
            self.replaced.len(),
            self.kept.len()
        );
        if !self.manifest_fallbacks.is_empty() {
            line.push_str(&format!(" ({} manifest fallback)", self.manifest_fallbacks.len()));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::MergeAction;

    #[test]
    fn outcomes_partition_paths() {
        let path = |p: &str| CanonicalPath::new(p).unwrap();
        let strategy = MergeStrategy::new(MergeAction::Replace, "test");
        let mut report = MergeReport::new();
        report.record(path("a.ts"), strategy, Outcome::Added);
        report.record(path("b.ts"), strategy, Outcome::Replaced);
        report.record(path("c.json"), strategy, Outcome::Kept);
        report.record(path("package.json"), strategy, Outcome::MergeFallback);

        assert_eq!(report.total(), 4);
        assert_eq!(report.replaced.len(), 2);
        assert_eq!(report.manifest_fallbacks, vec![path("package.json")]);
        assert_eq!(report.decisions.len(), 4);
        assert_eq!(report.summary(), "1 added, 2 replaced, 1 kept (1 manifest fallback)");
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("lost_baseline_files").is_none());
    }
}
