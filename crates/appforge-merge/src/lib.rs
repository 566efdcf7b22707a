//! # AppForge Merge
//!
//! Policy-driven merge of model-generated files into a scaffold baseline.
//!
//! ## Components
//!
//! - [`MergePolicyResolver`]: ordered `(matcher, action, reason)` table
//! - [`merge_manifest`]: field-level union of JSON dependency manifests
//! - [`IntegrityValidator`]: rejects any merge that loses a baseline file
//! - [`MergeSession`]: synchronous baseline and working set
//! - [`MergeEngine`]: actor serializing loads and merges through a FIFO
//!
//! ## Example
//!
//! ```
//! use appforge_files::FileSet;
//! use appforge_merge::MergeSession;
//!
//! let baseline = FileSet::try_from_entries([("config.json", "{}"), ("screens/home.tsx", "old")]).unwrap();
//! let incoming = FileSet::try_from_entries([("screens/home.tsx", "new"), ("components/Badge.tsx", "badge")]).unwrap();
//!
//! let mut session = MergeSession::new(baseline);
//! let report = session.merge(&incoming).unwrap();
//!
//! assert_eq!(report.summary(), "1 added, 1 replaced, 0 kept");
//! assert_eq!(session.merged().len(), 3);
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod manifest;
pub mod policy;
pub mod report;
pub mod session;
pub mod validator;

pub use config::{AppForgeConfig, PolicyConfig};
pub use engine::{MergeEngine, MergeEngineHandle, ResponseMerge, Ticket};
pub use error::{ConfigError, EngineError, ManifestMergeError, ManifestSide, MergeError};
pub use event::{EventSink, MergeEvent};
pub use manifest::merge_manifest;
pub use policy::{MergeAction, MergePolicyResolver, MergeStrategy, PathMatcher, PolicyRule, Presence};
pub use report::{MergeReport, Outcome, RecordDecision};
pub use session::MergeSession;
pub use validator::IntegrityValidator;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
