//! Tracing subscriber setup for hosts and demos.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! host's decision. [`init`] is a convenience for binaries that have no
//! subscriber of their own.
//!
//! Logs go to stderr so stdout stays free for [`JsonLineSink`](crate::sink::JsonLineSink).

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a stderr fmt subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once: if a global subscriber is already set, the
/// existing one is kept.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let result = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already initialized, keeping it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        init();
        // Second call must not panic
        init();
    }
}
