//! Log subscriber setup

use crate::cli::LogOptions;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "APPFORGE_LOG";

/// Filter from [`LOG_ENV`], falling back to `info` or `debug` with `--verbose`
#[must_use]
pub fn filter(options: LogOptions) -> EnvFilter {
    let fallback = if options.verbose { "debug" } else { "info" };
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global subscriber; logs always go to stderr
///
/// Returns false when a subscriber was already installed, in which case the
/// existing one is left in place.
pub fn init(options: LogOptions) -> bool {
    let registry = tracing_subscriber::registry().with(filter(options));
    let installed = if options.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(err) = installed {
        tracing::debug!(error = %err, "log subscriber already installed");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_keeps_the_first_subscriber() {
        init(LogOptions::default());
        assert!(!init(LogOptions {
            verbose: true,
            json: true,
        }));
    }
}
