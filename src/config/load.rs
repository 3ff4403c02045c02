//! The main config loading module for fnav.
//!
//! Handles loading and deserializing settings from `fnav.toml` into [Config],
//! by way of the internal [RawConfig]. Also writes the default config file for
//! `fnav --init`.

use crate::config::{General, InternalGeneral, Keys, LogSettings};
use crate::utils::get_home;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Raw configuration as read from the toml file.
/// Converted into [Config] once parsed.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub(crate) struct RawConfig {
    general: General,
    log: LogSettings,
    keys: Keys,
}

/// Processed configuration used by fnav.
#[derive(Debug)]
pub(crate) struct Config {
    general: InternalGeneral,
    log: LogSettings,
    keys: Keys,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            general: InternalGeneral::from(raw.general),
            log: raw.log,
            keys: raw.keys,
        }
    }
}

impl Config {
    /// Loads the configuration from [Config::default_path].
    ///
    /// A missing file silently yields the defaults. A file that cannot be read
    /// or parsed is reported on stderr and also yields the defaults.
    pub(crate) fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error reading config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reads and parses the config file at `path`.
    pub(crate) fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub(crate) fn parse(content: &str) -> io::Result<Self> {
        toml::from_str::<RawConfig>(content)
            .map(Self::from)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    // Getters

    #[inline]
    pub(crate) fn general(&self) -> &InternalGeneral {
        &self.general
    }

    #[inline]
    pub(crate) fn log(&self) -> &LogSettings {
        &self.log
    }

    #[inline]
    pub(crate) fn keys(&self) -> &Keys {
        &self.keys
    }

    /// Determine the configuration file path.
    /// Checks the FNAV_CONFIG environment variable first,
    /// then XDG_CONFIG_HOME,
    /// then defaults to ~/.config/fnav/fnav.toml.
    pub(crate) fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("FNAV_CONFIG")
            && !path.is_empty()
        {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config.is_empty()
        {
            return PathBuf::from(xdg_config).join("fnav/fnav.toml");
        }

        get_home().join(".config/fnav/fnav.toml")
    }

    /// Writes the default configuration file to `path`.
    /// Fails if a file already exists there.
    pub(crate) fn generate_default(path: &Path) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {}", path.display()),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_TOML)?;
        println!("Default config generated at {}", path.display());
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

const DEFAULT_TOML: &str = r##"# fnav.toml - default configuration for fnav
#
# Commented values are the internal defaults.

[general]
# show_hidden = false
# sort = "name"            # "name" or "time" (newest first)
# reverse = false
# filter = ""              # regex, matched against the start of each name
# confirm_delete = true

[log]
# level = "info"           # overridden by the FNAV_LOG environment variable
# file = "~/.local/share/fnav/fnav.log"

# [keys]
# go_up = ["k", "Up"]
# go_down = ["j", "Down"]
# go_to_top = ["g", "Home"]
# go_to_bottom = ["G", "End"]
# go_into_dir = ["l", "Right", "Enter"]
# go_parent = ["h", "Left", "Backspace"]
# toggle_select = ["space"]
# select_all = ["a"]
# delete = ["d"]
# copy = ["c"]
# move_file = ["m"]
# create_directory = ["n"]
# filter = ["f"]
# toggle_hidden = ["."]
# toggle_sort = ["t"]
# toggle_reverse = ["r"]
# refresh = ["Ctrl+r"]
# quit = ["q", "Esc"]
#
# Modifiers: <c-x> (Ctrl), <m-x>/<a-x> (Alt), <s-x> (Shift) or ctrl+x, alt+x, shift+x
# Special:   "space", "enter", "esc", "tab", "backspace", "up", "down", "left", "right"
"##;
