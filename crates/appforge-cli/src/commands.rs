//! `extract` and `merge` subcommands

use crate::tree::{read_tree, write_tree};
use anyhow::{Context, Result};
use appforge_extract::{Extraction, ResponseExtractor};
use appforge_files::{FileSet, OrganizedView};
use appforge_merge::{AppForgeConfig, MergeEngine, ResponseMerge};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load `appforge.toml` if given, defaults otherwise
///
/// # Errors
/// The file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<AppForgeConfig> {
    match path {
        Some(path) => AppForgeConfig::from_file(path).with_context(|| format!("loading config {}", path.display())),
        None => Ok(AppForgeConfig::default()),
    }
}

/// Inputs for `appforge extract`
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Raw model response
    pub response: PathBuf,
    /// Optional configuration file
    pub config: Option<PathBuf>,
}

/// Extract records from one response file
///
/// # Errors
/// Configuration or response file cannot be read.
pub async fn run_extract(options: &ExtractOptions) -> Result<Extraction> {
    let config = load_config(options.config.as_deref())?;
    let blob = tokio::fs::read_to_string(&options.response)
        .await
        .with_context(|| format!("reading response {}", options.response.display()))?;
    Ok(ResponseExtractor::with_config(config.extractor).extract_with_audit(&blob))
}

/// Inputs for `appforge merge`
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Baseline project directory
    pub baseline: PathBuf,
    /// Raw model responses, merged in order
    pub responses: Vec<PathBuf>,
    /// Optional configuration file
    pub config: Option<PathBuf>,
    /// Directory to write the merged tree into
    pub out: Option<PathBuf>,
}

/// Result of `appforge merge`
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutput {
    /// One entry per response, in order
    pub responses: Vec<ResponseMerge>,
    /// Final working set
    pub files: FileSet,
    /// Working set grouped by top-level directory
    pub view: OrganizedView,
    /// Files written to `--out`
    pub written: Option<usize>,
}

/// Load the baseline, merge every response and optionally write the result
///
/// Responses are queued on the engine while the baseline is still being
/// read from disk.
///
/// # Errors
/// Configuration, baseline or response reading fails, a merge is rejected,
/// or the output tree cannot be written.
pub async fn run_merge(options: &MergeOptions) -> Result<MergeOutput> {
    let config = load_config(options.config.as_deref())?;
    let engine = MergeEngine::from_config(config).spawn();

    let root = options.baseline.clone();
    let load = engine.load_baseline_with(async move {
        let read = tokio::task::spawn_blocking(move || read_tree(&root))
            .await
            .context("baseline reader panicked");
        read.and_then(|files| files).map_err(|e| format!("{e:#}"))
    });

    let mut tickets = Vec::with_capacity(options.responses.len());
    for path in &options.responses {
        let blob = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading response {}", path.display()))?;
        tickets.push((path, engine.merge_response(blob)));
    }

    load.await
        .with_context(|| format!("loading baseline {}", options.baseline.display()))?;

    let mut responses = Vec::with_capacity(tickets.len());
    for (path, ticket) in tickets {
        let merged = ticket
            .await
            .with_context(|| format!("merging response {}", path.display()))?;
        info!(response = %path.display(), summary = %merged.report.summary(), "response merged");
        responses.push(merged);
    }

    let files = engine.merged_files().await?;
    let view = engine.organized_view().await?;
    let written = match &options.out {
        Some(out) => Some(write_tree(out, &files)?),
        None => None,
    };

    Ok(MergeOutput {
        responses,
        files,
        view,
        written,
    })
}

/// Human-readable extraction listing
#[must_use]
pub fn render_extraction(extraction: &Extraction) -> String {
    let mut out = String::new();
    let strategy = extraction.audit.strategy.unwrap_or("none");
    match extraction.audit.variant {
        Some(variant) => {
            let _ = writeln!(out, "strategy: {strategy} ({variant})");
        }
        None => {
            let _ = writeln!(out, "strategy: {strategy}");
        }
    }
    for record in &extraction.records {
        let _ = writeln!(out, "  {} [{}] {} bytes", record.path(), record.kind(), record.content().len());
    }
    for skipped in &extraction.audit.skipped {
        let _ = writeln!(out, "  skipped {:?}: {}", skipped.raw_path, skipped.reason);
    }
    for duplicate in &extraction.audit.duplicates {
        let _ = writeln!(out, "  duplicate {} discarded ({} bytes)", duplicate.path, duplicate.discarded_bytes);
    }
    out
}

/// Human-readable merge summary
#[must_use]
pub fn render_merge(output: &MergeOutput) -> String {
    let mut out = String::new();
    for (index, merged) in output.responses.iter().enumerate() {
        let _ = writeln!(out, "response {}: {}", index + 1, merged.report.summary());
        for decision in &merged.report.decisions {
            let _ = writeln!(
                out,
                "  {:?} {} ({})",
                decision.outcome, decision.path, decision.strategy.reason
            );
        }
    }
    let _ = writeln!(out, "{} files", output.files.len());
    for (group, paths) in output.view.iter() {
        let _ = writeln!(out, "  {group}/ {}", paths.len());
    }
    if let Some(written) = output.written {
        let _ = writeln!(out, "wrote {written} files");
    }
    out
}
