//! AppForge response extraction
//!
//! Recovers discrete, path-addressed files from a language model completion.
//!
//! # Cascade
//!
//! Strategies are tried in order; the first whose candidates survive path
//! cleaning wins:
//!
//! 1. [`MarkerBlockStrategy`]: explicit headers ([`HeaderVariant`])
//! 2. [`DeclarationStrategy`]: top-level capitalized UI declarations
//! 3. [`BareFenceStrategy`]: every fenced block, named by content
//! 4. [`ContentSniffStrategy`]: manifest/config objects and module code in raw prose
//!
//! Duplicate paths keep the last occurrence. Dropped candidates and overridden
//! duplicates are reported in the [`ExtractionAudit`].
//!
//! # Example
//!
//! ```rust
//! use appforge_extract::ResponseExtractor;
//!
//! let blob = "FILE: app/index.tsx\nexport default function Home() {}\nEND FILE\n";
//! let records = ResponseExtractor::new().extract(blob);
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].path().as_str(), "app/index.tsx");
//! assert_eq!(records[0].content(), "export default function Home() {}\n");
//! ```

#![warn(unreachable_pub)]

mod audit;
mod config;
mod extractor;
mod residue;
mod strategy;
mod text;

pub use audit::{
    DiscardedDuplicate, Extraction, ExtractionAudit, RawCandidate, SkipReason, SkippedCandidate,
};
pub use config::ExtractorConfig;
pub use extractor::ResponseExtractor;
pub use strategy::{
    default_strategies, BareFenceStrategy, ContentSniffStrategy, DeclarationStrategy,
    ExtractionStrategy, HeaderVariant, MarkerBlockStrategy, StrategyOutput,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
