//! Bare code-block extraction

use super::declarations::{declarations, path_for_declaration};
use super::sniff::classify_json;
use super::{ExtractionStrategy, StrategyOutput};
use crate::audit::RawCandidate;
use crate::config::ExtractorConfig;
use crate::residue::trim_body;
use crate::text::fenced_blocks;

/// Extension for an unnamed snippet in `language`
fn extension_for(language: &str) -> &'static str {
    match language {
        "tsx" => "tsx",
        "jsx" => "jsx",
        "ts" | "typescript" => "ts",
        "js" | "javascript" => "js",
        "json" | "jsonc" => "json",
        "css" => "css",
        "html" => "html",
        "sh" | "bash" | "shell" | "zsh" => "sh",
        "yaml" | "yml" => "yaml",
        "md" | "markdown" => "md",
        _ => "txt",
    }
}

/// Name a fenced body by what it contains
fn sniff_path(language: &str, body: &str, index: usize, config: &ExtractorConfig) -> String {
    let looks_json = matches!(language, "json" | "jsonc") || body.trim_start().starts_with('{');
    if looks_json {
        if let Some(name) = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .as_ref()
            .and_then(classify_json)
        {
            return name.to_string();
        }
    }

    if let Some(decl) = declarations(body).first() {
        return path_for_declaration(decl.name, body, config);
    }

    config.fallback_path(&format!("snippet-{index}.{}", extension_for(language)))
}

/// Cascade step 3: every fenced block, named by content
#[derive(Debug, Clone, Copy, Default)]
pub struct BareFenceStrategy;

impl ExtractionStrategy for BareFenceStrategy {
    fn name(&self) -> &'static str {
        "bare_fences"
    }

    fn extract(&self, blob: &str, config: &ExtractorConfig) -> Option<StrategyOutput> {
        let candidates = fenced_blocks(blob)
            .into_iter()
            .enumerate()
            .map(|(i, block)| {
                let path = sniff_path(&block.language(), &block.body, i + 1, config);
                let content = trim_body(&block.body, &path);
                RawCandidate::new(path, content)
            })
            .collect();

        StrategyOutput::new(candidates).non_empty()
    }
}
