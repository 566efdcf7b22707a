//! Immutable file records

use crate::kind::FileKind;
use crate::path::{CanonicalPath, PathError};
use serde::Serialize;

/// One path-addressed file
///
/// Immutable once created: the kind is derived from the path at construction
/// and there are no setters. Produce a new record to change content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    path: CanonicalPath,
    content: String,
    kind: FileKind,
}

impl FileRecord {
    /// Create record for an already-validated path
    #[inline]
    #[must_use]
    pub fn new(path: CanonicalPath, content: impl Into<String>) -> Self {
        let kind = FileKind::from_path(&path);
        Self {
            path,
            content: content.into(),
            kind,
        }
    }

    /// Clean `raw_path` and create a record
    ///
    /// # Errors
    /// Returns the [`PathError`] from cleaning.
    #[inline]
    pub fn parse(raw_path: &str, content: impl Into<String>) -> Result<Self, PathError> {
        Ok(Self::new(CanonicalPath::new(raw_path)?, content))
    }

    /// Canonical path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &CanonicalPath {
        &self.path
    }

    /// File content
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Kind derived from the path
    #[inline]
    #[must_use]
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Same path, new content
    #[inline]
    #[must_use]
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self::new(self.path.clone(), content)
    }

    /// Split into path and content
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (CanonicalPath, String) {
        (self.path, self.content)
    }
}
