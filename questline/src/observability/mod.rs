//! Tracing setup for harnesses embedding the library.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the host test runner. This helper wires up a sensible default
//! for binaries and example harnesses.

use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber with an environment-driven filter.
///
/// `RUST_LOG` takes precedence; `default_level` is used when it is unset.
/// Safe to call more than once, later calls are ignored.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
