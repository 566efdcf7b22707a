//! Synchronous merge state for one project generation

use crate::config::PolicyConfig;
use crate::error::MergeError;
use crate::event::{EventSink, MergeEvent};
use crate::manifest::merge_manifest;
use crate::policy::{MergeAction, MergePolicyResolver};
use crate::report::{MergeReport, Outcome};
use crate::validator::IntegrityValidator;
use appforge_files::{FileRecord, FileSet, OrganizedView};
use tracing::{debug, error, info, warn};

/// Baseline plus the working merged set
///
/// The merged set starts as a copy of the baseline. Each merge builds a
/// candidate copy, validates it, and only then replaces the working set, so
/// a rejected merge leaves no partial changes behind.
#[derive(Debug, Clone)]
pub struct MergeSession {
    baseline: FileSet,
    merged: FileSet,
    resolver: MergePolicyResolver,
    union_sections: Vec<String>,
    validator: IntegrityValidator,
    events: EventSink,
    latest: Option<MergeReport>,
}

impl MergeSession {
    /// Start a session from a baseline with the default policy
    #[must_use]
    pub fn new(baseline: FileSet) -> Self {
        Self::with_policy(baseline, &PolicyConfig::default())
    }

    /// Start a session with explicit policy configuration
    #[must_use]
    pub fn with_policy(baseline: FileSet, policy: &PolicyConfig) -> Self {
        Self {
            merged: baseline.clone(),
            baseline,
            resolver: MergePolicyResolver::from_config(policy),
            union_sections: policy.union_sections.clone(),
            validator: IntegrityValidator::new(),
            events: EventSink::disabled(),
            latest: None,
        }
    }

    /// With a custom policy table in place of the one built from [`PolicyConfig`]
    #[inline]
    #[must_use]
    pub fn with_resolver(mut self, resolver: MergePolicyResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// With event sink
    #[inline]
    #[must_use]
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Original baseline
    #[inline]
    #[must_use]
    pub fn baseline(&self) -> &FileSet {
        &self.baseline
    }

    /// Current working set
    #[inline]
    #[must_use]
    pub fn merged(&self) -> &FileSet {
        &self.merged
    }

    /// Report of the last successful merge
    #[inline]
    #[must_use]
    pub fn latest_report(&self) -> Option<&MergeReport> {
        self.latest.as_ref()
    }

    /// Merged paths grouped by top-level directory
    #[must_use]
    pub fn organized_view(&self) -> OrganizedView {
        self.merged.organized_view()
    }

    /// Apply one incoming batch in record order
    ///
    /// Presence is checked against the working set, so a file added by an
    /// earlier merge is treated as existing. Per-record events are sent only
    /// once the merge has been accepted.
    ///
    /// # Errors
    /// [`MergeError::IntegrityViolation`] when a baseline path would be
    /// missing; the working set is unchanged.
    pub fn merge(&mut self, incoming: &FileSet) -> Result<MergeReport, MergeError> {
        let mut candidate = self.merged.clone();
        let mut report = MergeReport::new();
        let mut pending = Vec::with_capacity(incoming.len());

        for record in incoming.records() {
            let path = record.path();
            let existing = candidate.get(path.as_str()).map(|r| r.content().to_string());
            let strategy = self.resolver.resolve(path, existing.is_some());
            debug!(path = %path, action = %strategy.action, reason = strategy.reason, "resolved merge strategy");
            pending.push(MergeEvent::RecordResolved {
                path: path.clone(),
                action: strategy.action,
                reason: strategy.reason,
            });

            let outcome = match (strategy.action, existing) {
                (MergeAction::Keep, _) => Outcome::Kept,
                (MergeAction::Merge, Some(current)) => {
                    match merge_manifest(&current, record.content(), &self.union_sections) {
                        Ok(content) => {
                            candidate.insert(record.with_content(content));
                            Outcome::Merged
                        }
                        Err(err) => {
                            warn!(path = %path, error = %err, "manifest merge failed, replacing whole file");
                            pending.push(MergeEvent::ManifestFallback {
                                path: path.clone(),
                                error: err.to_string(),
                            });
                            candidate.insert(record.clone());
                            Outcome::MergeFallback
                        }
                    }
                }
                (_, existing) => {
                    candidate.insert(record.clone());
                    if existing.is_some() {
                        Outcome::Replaced
                    } else {
                        Outcome::Added
                    }
                }
            };
            report.record(path.clone(), strategy, outcome);
        }

        if let Err(err) = self.validator.check(&self.baseline, &candidate) {
            if let MergeError::IntegrityViolation { lost } = &err {
                error!(lost = lost.len(), "merge rejected: baseline files would be lost");
                self.events.emit(MergeEvent::IntegrityViolation { lost: lost.clone() });
            }
            return Err(err);
        }

        info!(
            added = report.added.len(),
            replaced = report.replaced.len(),
            kept = report.kept.len(),
            "merge applied"
        );
        for event in pending {
            self.events.emit(event);
        }
        self.events.emit(MergeEvent::MergeCompleted {
            added: report.added.len(),
            replaced: report.replaced.len(),
            kept: report.kept.len(),
        });

        self.merged = candidate;
        self.latest = Some(report.clone());
        Ok(report)
    }

    /// Merge records produced by the extractor
    ///
    /// # Errors
    /// See [`MergeSession::merge`].
    pub fn merge_records(&mut self, records: impl IntoIterator<Item = FileRecord>) -> Result<MergeReport, MergeError> {
        self.merge(&FileSet::from_records(records))
    }
}
