//! AppForge file model
//!
//! Path-addressed files for generated mobile app projects.
//!
//! # Core Concepts
//!
//! - [`CanonicalPath`]: validated relative path, produced only by [`clean`]
//! - [`FileRecord`]: immutable `(path, content, kind)` triple
//! - [`FileSet`]: insertion-ordered, last-write-wins collection of records
//! - [`OrganizedView`]: paths grouped by top-level directory
//!
//! # Example
//!
//! ```rust
//! use appforge_files::{clean, FileRecord, FileSet};
//!
//! let path = clean("📄 FILE: app/(tabs)/index.tsx").unwrap();
//! assert_eq!(path.as_str(), "app/(tabs)/index.tsx");
//!
//! let mut set = FileSet::new();
//! set.insert(FileRecord::new(path, "export default function Home() {}\n"));
//! assert!(set.contains("app/(tabs)/index.tsx"));
//! ```

#![warn(unreachable_pub)]

mod file_set;
mod kind;
mod path;
mod record;

pub use file_set::{FileSet, OrganizedView, ROOT_GROUP};
pub use kind::FileKind;
pub use path::{clean, clean_header, CanonicalPath, PathError, UnsafeReason};
pub use record::FileRecord;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
