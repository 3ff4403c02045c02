//! The `[log]` section of fnav.toml.

use serde::Deserialize;

use std::path::{Path, PathBuf};

/// Where and how verbosely fnav logs. Both fields are optional; see
/// [init_logging](crate::utils::logging::init_logging) for the fallbacks.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub(crate) struct LogSettings {
    level: Option<String>,
    file: Option<PathBuf>,
}

impl LogSettings {
    #[inline]
    pub(crate) fn level(&self) -> Option<&str> {
        self.level.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }

    #[inline]
    pub(crate) fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}
