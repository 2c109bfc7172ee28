//! Utility functions used by the terminal front end

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Get platform-specific debug log path
pub fn get_debug_log_path() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push("facesort-debug.log");
    path
}

/// Route `tracing` output to the debug log (stdout belongs to the TUI)
///
/// Without `--debug` nothing is installed and events are discarded.
pub fn init_logging(debug: bool) -> Result<()> {
    if !debug {
        return Ok(());
    }

    let path = get_debug_log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open debug log {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("facesort=debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!("Debug logging to {}", path.display());
    Ok(())
}
