//! Post-merge check that no baseline file went missing

use crate::error::MergeError;
use appforge_files::{CanonicalPath, FileSet};

/// Stateless baseline-preservation check
///
/// Content changes are allowed. A baseline path missing from the merged set
/// is a violation.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegrityValidator;

impl IntegrityValidator {
    /// Create validator
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Baseline paths absent from `merged`, in baseline order; empty when intact
    #[must_use]
    pub fn validate(&self, baseline: &FileSet, merged: &FileSet) -> Vec<CanonicalPath> {
        baseline.missing_from(merged)
    }

    /// Same check as an error
    ///
    /// # Errors
    /// [`MergeError::IntegrityViolation`] listing every lost path.
    pub fn check(&self, baseline: &FileSet, merged: &FileSet) -> Result<(), MergeError> {
        let lost = self.validate(baseline, merged);
        if lost.is_empty() {
            Ok(())
        } else {
            Err(MergeError::IntegrityViolation { lost })
        }
    }
}
