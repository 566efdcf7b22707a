//! Argument definitions

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

use crate::commands::{ExtractOptions, MergeOptions};

/// Parsed invocation
#[derive(Debug, Clone)]
pub enum Invocation {
    /// `appforge extract`
    Extract {
        /// Command inputs
        options: ExtractOptions,
        /// Print JSON instead of text
        json: bool,
    },
    /// `appforge merge`
    Merge {
        /// Command inputs
        options: MergeOptions,
        /// Print JSON instead of text
        json: bool,
    },
}

/// Global flags shared by every subcommand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// `--verbose`
    pub verbose: bool,
    /// `--log-json`
    pub json: bool,
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("appforge.toml with [policy] and [extractor] tables")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

/// Build the command tree
#[must_use]
pub fn command() -> Command {
    Command::new("appforge")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract files from model responses and merge them into a scaffold baseline")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging unless APPFORGE_LOG is set"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("extract")
                .about("List the files recovered from one response")
                .arg(
                    Arg::new("response")
                        .required(true)
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Raw model response"),
                )
                .arg(config_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("merge")
                .about("Merge responses into a baseline directory")
                .arg(
                    Arg::new("baseline")
                        .long("baseline")
                        .required(true)
                        .value_name("DIR")
                        .value_parser(value_parser!(PathBuf))
                        .help("Scaffold baseline directory"),
                )
                .arg(
                    Arg::new("response")
                        .long("response")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Raw model response; repeat to merge several in order"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_name("DIR")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the merged tree here"),
                )
                .arg(config_arg())
                .arg(json_arg()),
        )
}

fn path(args: &ArgMatches, id: &str) -> Option<PathBuf> {
    args.get_one::<PathBuf>(id).cloned()
}

/// Turn matches into an [`Invocation`]
///
/// Returns `None` for an unknown subcommand.
#[must_use]
pub fn invocation(matches: &ArgMatches) -> Option<(Invocation, LogOptions)> {
    let log = LogOptions {
        verbose: matches.get_flag("verbose"),
        json: matches.get_flag("log-json"),
    };

    let invocation = match matches.subcommand()? {
        ("extract", args) => Invocation::Extract {
            options: ExtractOptions {
                response: path(args, "response")?,
                config: path(args, "config"),
            },
            json: args.get_flag("json"),
        },
        ("merge", args) => Invocation::Merge {
            options: MergeOptions {
                baseline: path(args, "baseline")?,
                responses: args
                    .get_many::<PathBuf>("response")
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default(),
                config: path(args, "config"),
                out: path(args, "out"),
            },
            json: args.get_flag("json"),
        },
        _ => return None,
    };
    Some((invocation, log))
}
