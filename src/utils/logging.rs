//! Tracing subscriber setup.
//!
//! fnav owns the terminal while it runs, so log output always goes to a file.
//! Logging is optional: if the file cannot be opened fnav runs without a
//! subscriber and the `tracing` macros become no-ops.

use crate::config::LogSettings;
use crate::utils::expand_home_path;

use tracing_subscriber::EnvFilter;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

/// Environment variable holding an `EnvFilter` directive, e.g. `debug`.
pub const LOG_ENV: &str = "FNAV_LOG";

const DEFAULT_LEVEL: &str = "info";

/// Resolves the filter directive: `FNAV_LOG`, then the config, then `info`.
pub(crate) fn log_level(settings: &LogSettings) -> String {
    std::env::var(LOG_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| settings.level().map(str::to_string))
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

/// The configured log file, or `<data dir>/fnav/fnav.log`.
pub(crate) fn log_file(settings: &LogSettings) -> Option<PathBuf> {
    match settings.file() {
        Some(path) => Some(expand_home_path(path)),
        None => dirs::data_dir().map(|d| d.join("fnav").join("fnav.log")),
    }
}

/// Installs a fmt subscriber writing to the log file.
///
/// Returns the path being logged to, or `None` if logging is disabled.
/// Safe to call more than once; only the first call installs a subscriber.
pub(crate) fn init_logging(settings: &LogSettings) -> Option<PathBuf> {
    let path = log_file(settings)?;
    if let Some(parent) = path.parent()
        && fs::create_dir_all(parent).is_err()
    {
        return None;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    let filter = EnvFilter::try_new(log_level(settings))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .ok()?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "fnav started");
    Some(path)
}
