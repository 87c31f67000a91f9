// Logging module - Logging infrastructure
use crate::domain::error::{TermConError, TermConResult};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(log_level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { log_level };
    format!("termcon={}", level)
}

/// Initialize logging system
///
/// Everything goes to stderr so stdout and the relayed terminal stay clean.
pub fn init_logging(log_level: &str, verbose: bool) -> TermConResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level, verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .try_init()
        .map_err(|e| TermConError::config(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!("TermCon logging system initialized");
    Ok(())
}
