//! File kinds derived from path extensions

use crate::path::CanonicalPath;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Closed classification of project files
///
/// Derived purely from the path; content is never inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Program source (TypeScript, JavaScript, styles, native code)
    Source,
    /// Structured configuration or dependency metadata
    Manifest,
    /// Markup and documents
    Markup,
    /// Plain text and dotfiles
    Text,
    /// Anything else (binary assets, unknown extensions)
    Unknown,
}

impl FileKind {
    /// Classify a path by its extension
    #[must_use]
    pub fn from_path(path: &CanonicalPath) -> Self {
        let Some(ext) = path.extension() else {
            return if path.file_name().starts_with('.') {
                Self::Text
            } else {
                Self::Unknown
            };
        };

        match ext.to_ascii_lowercase().as_str() {
            "ts" | "tsx" | "js" | "jsx" | "mjs" | "cjs" | "css" | "scss" | "kt" | "java"
            | "swift" | "m" | "mm" | "rs" | "py" | "go" | "sh" => Self::Source,
            "json" | "yaml" | "yml" | "toml" | "lock" | "plist" | "gradle" | "properties" => {
                Self::Manifest
            }
            "html" | "htm" | "xml" | "svg" | "md" | "mdx" => Self::Markup,
            "txt" | "env" | "log" | "csv" => Self::Text,
            _ => Self::Unknown,
        }
    }

    /// Stable lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Manifest => "manifest",
            Self::Markup => "markup",
            Self::Text => "text",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for FileKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
