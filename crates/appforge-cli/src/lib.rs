//! # AppForge CLI
//!
//! `appforge extract` lists what the extractor recovers from a response.
//! `appforge merge` loads a baseline directory, merges responses in order
//! and prints or writes the result.

#![warn(unreachable_pub)]

pub mod cli;
pub mod commands;
pub mod telemetry;
pub mod tree;

use anyhow::Result;
pub use cli::{command, invocation, Invocation, LogOptions};
pub use commands::{run_extract, run_merge, ExtractOptions, MergeOptions, MergeOutput};

/// Run one invocation and return what should be printed on stdout
///
/// # Errors
/// Any failure of the underlying command.
pub async fn execute(invocation: &Invocation) -> Result<String> {
    match invocation {
        Invocation::Extract { options, json } => {
            let extraction = run_extract(options).await?;
            if *json {
                Ok(serde_json::to_string_pretty(&extraction)?)
            } else {
                Ok(commands::render_extraction(&extraction))
            }
        }
        Invocation::Merge { options, json } => {
            let output = run_merge(options).await?;
            if *json {
                Ok(serde_json::to_string_pretty(&output)?)
            } else {
                Ok(commands::render_merge(&output))
            }
        }
    }
}
