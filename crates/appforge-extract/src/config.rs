//! Extractor configuration

use serde::{Deserialize, Serialize};

/// Directories used when a strategy has to synthesize a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Where `*Screen` declarations land (`HomeScreen` → `app/(tabs)/index.tsx`)
    pub screens_dir: String,
    /// Where other named UI declarations land
    pub components_dir: String,
    /// Where unnamed snippets land
    pub fallback_dir: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            screens_dir: "app/(tabs)".to_string(),
            components_dir: "components".to_string(),
            fallback_dir: "generated".to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Set screens directory
    #[must_use]
    pub fn with_screens_dir(mut self, dir: impl Into<String>) -> Self {
        self.screens_dir = dir.into();
        self
    }

    /// Set components directory
    #[must_use]
    pub fn with_components_dir(mut self, dir: impl Into<String>) -> Self {
        self.components_dir = dir.into();
        self
    }

    /// Set fallback directory
    #[must_use]
    pub fn with_fallback_dir(mut self, dir: impl Into<String>) -> Self {
        self.fallback_dir = dir.into();
        self
    }

    pub(crate) fn screen_path(&self, file_stem: &str) -> String {
        format!("{}/{file_stem}.tsx", self.screens_dir.trim_end_matches('/'))
    }

    pub(crate) fn component_path(&self, name: &str, ext: &str) -> String {
        format!("{}/{name}.{ext}", self.components_dir.trim_end_matches('/'))
    }

    pub(crate) fn fallback_path(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.fallback_dir.trim_end_matches('/'))
    }
}
