//! Response extractor: the strategy cascade plus cleaning and deduplication

use crate::audit::{
    DiscardedDuplicate, Extraction, ExtractionAudit, RawCandidate, SkipReason, SkippedCandidate,
};
use crate::config::ExtractorConfig;
use crate::strategy::{default_strategies, ExtractionStrategy};
use appforge_files::{clean_header, CanonicalPath, FileRecord};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Turns a free-form model response into file records
///
/// Never fails: the worst case is an empty [`Extraction`]. Extraction is pure
/// and holds no state beyond its configuration, so one extractor can be shared
/// across threads.
pub struct ResponseExtractor {
    config: ExtractorConfig,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResponseExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseExtractor")
            .field("config", &self.config)
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

impl ResponseExtractor {
    /// Extractor with the built-in cascade and default directories
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    /// Extractor with the built-in cascade
    #[must_use]
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self {
            config,
            strategies: default_strategies(),
        }
    }

    /// Extractor with no strategies; add them with [`Self::register`]
    #[must_use]
    pub fn empty(config: ExtractorConfig) -> Self {
        Self {
            config,
            strategies: Vec::new(),
        }
    }

    /// Append a strategy to the end of the cascade
    pub fn register<S: ExtractionStrategy>(&mut self, strategy: S) {
        self.strategies.push(Box::new(strategy));
    }

    /// Strategy names in cascade order
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Records only
    #[must_use]
    pub fn extract(&self, blob: &str) -> Vec<FileRecord> {
        self.extract_with_audit(blob).records
    }

    /// Records plus the audit of what was chosen, skipped and overridden
    #[must_use]
    pub fn extract_with_audit(&self, blob: &str) -> Extraction {
        let mut audit = ExtractionAudit::default();

        for strategy in &self.strategies {
            let Some(output) = strategy.extract(blob, &self.config) else {
                continue;
            };

            let accepted = accept(strategy.name(), output.candidates, &mut audit.skipped);
            if accepted.is_empty() {
                debug!(strategy = strategy.name(), "strategy produced no usable records");
                continue;
            }

            debug!(
                strategy = strategy.name(),
                variant = output.variant,
                records = accepted.len(),
                "extraction strategy chosen"
            );
            audit.strategy = Some(strategy.name());
            audit.variant = output.variant;
            let records = dedupe(accepted, &mut audit.duplicates);
            return Extraction { records, audit };
        }

        debug!("no strategy recovered any file");
        Extraction {
            records: Vec::new(),
            audit,
        }
    }
}

/// Clean paths and drop empty bodies
fn accept(
    strategy: &'static str,
    candidates: Vec<RawCandidate>,
    skipped: &mut Vec<SkippedCandidate>,
) -> Vec<(String, FileRecord)> {
    let mut accepted = Vec::with_capacity(candidates.len());

    for RawCandidate { raw_path, content } in candidates {
        let reason = match clean_header(&raw_path) {
            Err(err) => SkipReason::InvalidPath(err),
            Ok(_) if content.trim().is_empty() => SkipReason::EmptyContent,
            Ok(path) => {
                accepted.push((raw_path, FileRecord::new(path, content)));
                continue;
            }
        };
        warn!(strategy, raw_path = %raw_path, %reason, "skipping extracted candidate");
        skipped.push(SkippedCandidate {
            strategy,
            raw_path,
            reason,
        });
    }

    accepted
}

/// Keep the last occurrence of each path, positioned where it last appeared
fn dedupe(
    accepted: Vec<(String, FileRecord)>,
    duplicates: &mut Vec<DiscardedDuplicate>,
) -> Vec<FileRecord> {
    let mut unique: IndexMap<CanonicalPath, (String, FileRecord)> = IndexMap::new();

    for (raw_path, record) in accepted {
        if let Some((earlier_raw, earlier)) = unique.shift_remove(record.path().as_str()) {
            debug!(path = %earlier.path(), "discarding earlier duplicate");
            duplicates.push(DiscardedDuplicate {
                path: earlier.path().clone(),
                raw_path: earlier_raw,
                discarded_bytes: earlier.content().len(),
            });
        }
        unique.insert(record.path().clone(), (raw_path, record));
    }

    unique.into_values().map(|(_, record)| record).collect()
}
