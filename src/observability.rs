//! # Logging Setup
//!
//! Structured logging initialization for the binary. Filtering follows
//! `RUST_LOG` with an `info` default.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber
///
/// Safe to call once per process; later calls are ignored so tests can call
/// it freely.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
