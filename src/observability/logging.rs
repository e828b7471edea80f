//! Structured logging initialization.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initializes the global tracing subscriber.
///
/// Filter level comes from `ACCESSMAP_LOG` (falling back to `RUST_LOG`, then
/// `info`). Safe to call more than once; only the first call installs.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("ACCESSMAP_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}
