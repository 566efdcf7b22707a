//! Error types for the merge layer
//!
//! Only [`MergeError::IntegrityViolation`] ever escapes a merge call. Manifest
//! failures are absorbed into a whole-file replace and reported, never raised.

use appforge_files::CanonicalPath;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// Which side of a manifest merge failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestSide {
    /// File already in the working set
    Baseline,
    /// File proposed by the model
    Incoming,
}

impl Display for ManifestSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Baseline => "baseline",
            Self::Incoming => "incoming",
        })
    }
}

/// Structured manifest merge failed; the caller falls back to replace
#[derive(Debug, thiserror::Error)]
pub enum ManifestMergeError {
    /// Content is not JSON
    #[error("{side} manifest is not valid JSON: {source}")]
    InvalidJson {
        /// Failing side
        side: ManifestSide,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },

    /// Content is JSON but not an object
    #[error("{side} manifest is not a JSON object")]
    NotAnObject {
        /// Failing side
        side: ManifestSide,
    },

    /// Merged document could not be rendered
    #[error("failed to render merged manifest: {0}")]
    Render(#[source] serde_json::Error),
}

/// Fatal outcome of one merge call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// Baseline files would be missing from the result; nothing was applied
    #[error("integrity violation: {} baseline file(s) would be lost", .lost.len())]
    IntegrityViolation {
        /// Baseline paths absent from the would-be result
        lost: Vec<CanonicalPath>,
    },
}

/// Errors surfaced by the engine handle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Merge rejected
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// Baseline source failed; queued operations stay queued
    #[error("baseline load failed: {message}")]
    BaselineLoad {
        /// Error reported by the source
        message: String,
    },

    /// Engine task is gone
    #[error("merge engine stopped")]
    Stopped,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML did not match the schema
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
