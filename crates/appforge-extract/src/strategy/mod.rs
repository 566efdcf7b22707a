//! Extraction strategies
//!
//! Each strategy is a pure function from a response blob to raw candidates.
//! The extractor tries them in order and stops at the first one whose
//! candidates survive path cleaning.

use crate::audit::RawCandidate;
use crate::config::ExtractorConfig;

mod declarations;
mod fences;
mod markers;
mod sniff;

pub use declarations::DeclarationStrategy;
pub use fences::BareFenceStrategy;
pub use markers::{HeaderVariant, MarkerBlockStrategy};
pub use sniff::ContentSniffStrategy;

/// Candidates proposed by one strategy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyOutput {
    /// Sub-variant used, when a strategy has several
    pub variant: Option<&'static str>,
    /// Candidates in document order
    pub candidates: Vec<RawCandidate>,
}

impl StrategyOutput {
    /// Output without a variant
    #[must_use]
    pub fn new(candidates: Vec<RawCandidate>) -> Self {
        Self {
            variant: None,
            candidates,
        }
    }

    /// Tag the output with a variant name
    #[must_use]
    pub fn with_variant(mut self, variant: &'static str) -> Self {
        self.variant = Some(variant);
        self
    }

    /// `None` when there are no candidates
    #[must_use]
    pub fn non_empty(self) -> Option<Self> {
        (!self.candidates.is_empty()).then_some(self)
    }
}

/// One step of the extraction cascade
///
/// Implement this trait to add a new response shape.
pub trait ExtractionStrategy: Send + Sync + 'static {
    /// Stable strategy name for audit and logs
    fn name(&self) -> &'static str;

    /// Propose candidates, or `None` when the response has no matching shape
    fn extract(&self, blob: &str, config: &ExtractorConfig) -> Option<StrategyOutput>;
}

/// Built-in cascade in priority order
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(MarkerBlockStrategy),
        Box::new(DeclarationStrategy),
        Box::new(BareFenceStrategy),
        Box::new(ContentSniffStrategy),
    ]
}
