//! Extraction results and their audit trail

use appforge_files::{CanonicalPath, FileRecord, FileSet, PathError};
use serde::{Serialize, Serializer};
use std::fmt::{self, Display, Formatter};

/// Uncleaned `(path, content)` pair proposed by a strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    /// Path exactly as found or synthesized
    pub raw_path: String,
    /// Content with header residue already trimmed
    pub content: String,
}

impl RawCandidate {
    /// Create candidate
    #[must_use]
    pub fn new(raw_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            raw_path: raw_path.into(),
            content: content.into(),
        }
    }
}

/// Why a candidate did not become a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Path failed cleaning
    InvalidPath(PathError),
    /// Body was empty after residue trimming
    EmptyContent,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPath(err) => write!(f, "{err}"),
            Self::EmptyContent => f.write_str("empty content"),
        }
    }
}

impl Serialize for SkipReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Candidate dropped during extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCandidate {
    /// Strategy that proposed it
    pub strategy: &'static str,
    /// Path as proposed
    pub raw_path: String,
    /// Drop reason
    pub reason: SkipReason,
}

/// Earlier occurrence of a path that a later one overrode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscardedDuplicate {
    /// Canonical path that appeared more than once
    pub path: CanonicalPath,
    /// Raw header of the discarded occurrence
    pub raw_path: String,
    /// Size of the discarded body in bytes
    pub discarded_bytes: usize,
}

/// What happened while extracting one response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionAudit {
    /// Strategy that produced the records, `None` if nothing was found
    pub strategy: Option<&'static str>,
    /// Header variant for the marker strategy
    pub variant: Option<&'static str>,
    /// Candidates dropped by every attempted strategy
    pub skipped: Vec<SkippedCandidate>,
    /// Overridden duplicates, in document order
    pub duplicates: Vec<DiscardedDuplicate>,
}

/// Records recovered from one response, plus the audit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// Deduplicated records in document order of their winning occurrence
    pub records: Vec<FileRecord>,
    /// Audit trail
    pub audit: ExtractionAudit,
}

impl Extraction {
    /// True when no strategy produced a record
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Incoming set for the merge engine
    #[must_use]
    pub fn into_file_set(self) -> FileSet {
        FileSet::from_records(self.records)
    }
}

impl From<Extraction> for FileSet {
    fn from(extraction: Extraction) -> Self {
        extraction.into_file_set()
    }
}
