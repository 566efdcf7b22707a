//! Merge policy and engine configuration

use crate::error::ConfigError;
use appforge_extract::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Project layout knowledge behind the merge rule table
///
/// Every field has a default matching an Expo Router scaffold, so a TOML
/// file only needs to list what differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Root of the route tree
    pub route_root: String,
    /// File stems of navigation layouts inside the route tree
    pub layout_stems: Vec<String>,
    /// Shared components directory
    pub components_dir: String,
    /// Component stems other files depend on
    pub core_components: Vec<String>,
    /// Hooks directory
    pub hooks_dir: String,
    /// Hook stems other files depend on
    pub core_hooks: Vec<String>,
    /// Root-level dependency manifests merged field by field
    pub manifest_names: Vec<String>,
    /// Root-level project configuration files
    pub root_config_names: Vec<String>,
    /// Suffixes that mark a root-level file as configuration
    pub root_config_suffixes: Vec<String>,
    /// Directories of freely replaceable content
    pub content_dirs: Vec<String>,
    /// Manifest sections unioned during a merge
    pub union_sections: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            route_root: "app".to_string(),
            layout_stems: strings(&["_layout"]),
            components_dir: "components".to_string(),
            core_components: strings(&[
                "ThemedText",
                "ThemedView",
                "HelloWave",
                "ParallaxScrollView",
                "ExternalLink",
                "HapticTab",
                "Collapsible",
                "IconSymbol",
                "TabBarBackground",
            ]),
            hooks_dir: "hooks".to_string(),
            core_hooks: strings(&["useColorScheme", "useThemeColor"]),
            manifest_names: strings(&["package.json"]),
            root_config_names: strings(&[
                "app.json",
                "app.config.js",
                "app.config.ts",
                "tsconfig.json",
                "babel.config.js",
                "metro.config.js",
                "eas.json",
                "expo-env.d.ts",
                "package-lock.json",
                "yarn.lock",
                ".gitignore",
            ]),
            root_config_suffixes: strings(&[".json", ".config.js", ".config.ts", ".lock"]),
            content_dirs: strings(&["constants", "lib", "utils", "types", "assets"]),
            union_sections: strings(&["dependencies", "devDependencies", "scripts"]),
        }
    }
}

impl PolicyConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With route tree root
    #[inline]
    #[must_use]
    pub fn with_route_root(mut self, root: impl Into<String>) -> Self {
        self.route_root = root.into();
        self
    }

    /// With an extra core component
    #[must_use]
    pub fn with_core_component(mut self, stem: impl Into<String>) -> Self {
        self.core_components.push(stem.into());
        self
    }

    /// With an extra core hook
    #[must_use]
    pub fn with_core_hook(mut self, stem: impl Into<String>) -> Self {
        self.core_hooks.push(stem.into());
        self
    }

    /// With union sections replacing the defaults
    #[must_use]
    pub fn with_union_sections<S: Into<String>>(mut self, sections: impl IntoIterator<Item = S>) -> Self {
        self.union_sections = sections.into_iter().map(Into::into).collect();
        self
    }
}

/// Full `appforge.toml`: `[policy]` and `[extractor]` tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppForgeConfig {
    /// Merge rule table inputs
    pub policy: PolicyConfig,
    /// Synthesized path directories
    pub extractor: ExtractorConfig,
}

impl AppForgeConfig {
    /// Parse TOML text
    ///
    /// # Errors
    /// [`ConfigError::Parse`] when the text is not valid for the schema.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        Self::from_toml_str(&text)
    }
}
