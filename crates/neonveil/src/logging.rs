//! File-backed tracing subscriber.
//!
//! The terminal belongs to the UI, so events go to a log file in the
//! platform data directory instead of stderr.

use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};

use color_eyre::eyre::eyre;
use neonveil_config::Config;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "neonveil.log";

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
///
/// Returns the log file path, or `None` when the platform has no data
/// directory and logging stays disabled.
pub fn init(level: &str) -> color_eyre::Result<Option<PathBuf>> {
    let Some(dir) = Config::data_dir() else {
        return Ok(None);
    };
    fs::create_dir_all(&dir)?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("failed to install log subscriber: {e}"))?;
    Ok(Some(path))
}
