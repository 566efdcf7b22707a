//! Merge policy: an ordered `(matcher, action, reason)` table
//!
//! Rules are evaluated top to bottom and the first match wins. The table is
//! conservative toward structural files and permissive toward screens and
//! content.

use crate::config::PolicyConfig;
use appforge_files::CanonicalPath;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// What to do with one incoming record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeAction {
    /// Existing file wins, incoming is dropped
    Keep,
    /// Incoming file overwrites or adds
    Replace,
    /// Field-level union of a structured manifest
    Merge,
}

impl Display for MergeAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keep => "keep",
            Self::Replace => "replace",
            Self::Merge => "merge",
        })
    }
}

/// Resolved decision plus a human-readable reason for audit
///
/// The reason has no behavioral effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeStrategy {
    /// Action to apply
    pub action: MergeAction,
    /// Why this action was chosen
    pub reason: &'static str,
}

impl MergeStrategy {
    /// Create strategy
    #[inline]
    #[must_use]
    pub const fn new(action: MergeAction, reason: &'static str) -> Self {
        Self { action, reason }
    }
}

/// Whether the path must already exist in the working set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Either way
    #[default]
    Any,
    /// Path already exists
    Present,
    /// Path is new
    Absent,
}

impl Presence {
    fn admits(self, exists: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Present => exists,
            Self::Absent => !exists,
        }
    }
}

/// Path shapes a rule can select
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    /// Root-level file with one of these exact names
    RootNamed(Vec<String>),
    /// Root-level file with one of these names or suffixes
    RootConfig {
        /// Exact file names
        names: Vec<String>,
        /// File name suffixes
        suffixes: Vec<String>,
    },
    /// File at any depth under `dir` whose stem is listed
    StemUnder {
        /// Directory
        dir: String,
        /// File stems
        stems: Vec<String>,
    },
    /// File at any depth under `dir`
    Under(String),
    /// File at any depth under any of these directories
    UnderAny(Vec<String>),
    /// Every path
    Any,
}

impl PathMatcher {
    /// Check the path shape
    #[must_use]
    pub fn matches(&self, path: &CanonicalPath) -> bool {
        let listed = |items: &[String], value: &str| items.iter().any(|i| i == value);
        match self {
            Self::RootNamed(names) => path.is_root_level() && listed(names, path.file_name()),
            Self::RootConfig { names, suffixes } => {
                path.is_root_level()
                    && (listed(names, path.file_name())
                        || suffixes.iter().any(|s| path.file_name().ends_with(s.as_str())))
            }
            Self::StemUnder { dir, stems } => path.is_under(dir) && listed(stems, path.stem()),
            Self::Under(dir) => path.is_under(dir),
            Self::UnderAny(dirs) => dirs.iter().any(|d| path.is_under(d)),
            Self::Any => true,
        }
    }
}

/// One row of the policy table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRule {
    /// Path shape
    pub matcher: PathMatcher,
    /// Existence requirement
    pub presence: Presence,
    /// Decision when matched
    pub strategy: MergeStrategy,
}

impl PolicyRule {
    /// Create rule
    #[must_use]
    pub fn new(matcher: PathMatcher, presence: Presence, action: MergeAction, reason: &'static str) -> Self {
        Self {
            matcher,
            presence,
            strategy: MergeStrategy::new(action, reason),
        }
    }

    /// Check whether the rule applies
    #[must_use]
    pub fn applies(&self, path: &CanonicalPath, exists: bool) -> bool {
        self.presence.admits(exists) && self.matcher.matches(path)
    }
}

/// Used when a custom table has no catch-all row
const FALLBACK: MergeStrategy = MergeStrategy::new(MergeAction::Replace, "no rule matched; incoming file wins");

/// Maps a path to a [`MergeStrategy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePolicyResolver {
    rules: Vec<PolicyRule>,
}

impl Default for MergePolicyResolver {
    fn default() -> Self {
        Self::from_config(&PolicyConfig::default())
    }
}

impl MergePolicyResolver {
    /// Resolver with the default Expo Router table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with an explicit table
    #[must_use]
    pub fn with_rules(rules: Vec<PolicyRule>) -> Self {
        Self { rules }
    }

    /// Build the standard table from layout configuration
    ///
    /// `Keep` rows match on path alone: a structural file the baseline lacks is
    /// kept out rather than added. Manifests merge only when present; an absent
    /// manifest is added as written.
    #[must_use]
    pub fn from_config(config: &PolicyConfig) -> Self {
        use MergeAction::{Keep, Merge, Replace};
        use Presence::{Absent, Any, Present};

        let rules = vec![
            PolicyRule::new(
                PathMatcher::RootNamed(config.manifest_names.clone()),
                Present,
                Merge,
                "dependency manifest: union dependency sections",
            ),
            PolicyRule::new(
                PathMatcher::RootNamed(config.manifest_names.clone()),
                Absent,
                Replace,
                "new dependency manifest",
            ),
            PolicyRule::new(
                PathMatcher::RootConfig {
                    names: config.root_config_names.clone(),
                    suffixes: config.root_config_suffixes.clone(),
                },
                Any,
                Keep,
                "root project configuration is structural",
            ),
            PolicyRule::new(
                PathMatcher::StemUnder {
                    dir: config.route_root.clone(),
                    stems: config.layout_stems.clone(),
                },
                Any,
                Keep,
                "navigation layout must stay intact",
            ),
            PolicyRule::new(
                PathMatcher::Under(config.route_root.clone()),
                Present,
                Replace,
                "screen file: primary customization surface",
            ),
            PolicyRule::new(
                PathMatcher::Under(config.route_root.clone()),
                Absent,
                Replace,
                "new route",
            ),
            PolicyRule::new(
                PathMatcher::StemUnder {
                    dir: config.components_dir.clone(),
                    stems: config.core_components.clone(),
                },
                Any,
                Keep,
                "core shared component",
            ),
            PolicyRule::new(
                PathMatcher::Under(config.components_dir.clone()),
                Any,
                Replace,
                "component file: customization surface",
            ),
            PolicyRule::new(
                PathMatcher::StemUnder {
                    dir: config.hooks_dir.clone(),
                    stems: config.core_hooks.clone(),
                },
                Any,
                Keep,
                "core shared hook",
            ),
            PolicyRule::new(
                PathMatcher::Under(config.hooks_dir.clone()),
                Any,
                Replace,
                "hook file: customization surface",
            ),
            PolicyRule::new(
                PathMatcher::UnderAny(config.content_dirs.clone()),
                Any,
                Replace,
                "content file: additive",
            ),
            PolicyRule::new(PathMatcher::Any, Any, Replace, "default: incoming file wins"),
        ];

        Self { rules }
    }

    /// Rules in evaluation order
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    /// First matching rule's strategy
    #[must_use]
    pub fn resolve(&self, path: &CanonicalPath, exists: bool) -> MergeStrategy {
        self.rules
            .iter()
            .find(|rule| rule.applies(path, exists))
            .map_or(FALLBACK, |rule| rule.strategy)
    }
}
