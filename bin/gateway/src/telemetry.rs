//! Telemetry initialization for the gateway binary.

use anyhow::{anyhow, Result};
use tracing::Level;

/// Initializes the global tracing subscriber, mapping the `-v` count to a
/// maximum level.
pub(crate) fn init(v: u8) -> Result<()> {
    let level = match v {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = tracing_subscriber::fmt().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).map_err(|e| anyhow!(e))
}
