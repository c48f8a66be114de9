//! Tracing subscriber setup for hosts without their own.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Default filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "market_core=info,warn";

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into())
}

/// Installs a global fmt subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_filter`.
///
/// # Errors
/// Returns error if a global subscriber is already set
pub fn init(default_filter: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
}

/// Like [`init`], but emits one JSON object per event.
///
/// # Errors
/// Returns error if a global subscriber is already set
pub fn init_json(default_filter: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails_without_panicking() {
        // Whichever call comes first may win; the later one must report an error.
        let first = init("debug");
        let second = init_json(DEFAULT_FILTER);
        assert!(first.is_err() || second.is_err());
        assert!(init(DEFAULT_FILTER).is_err());
    }
}
