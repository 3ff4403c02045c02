//! Configuration for fnav, read from `fnav.toml`.
//!
//! - [load]: locating, parsing and generating the config file ([Config]).
//! - [general]: listing defaults and behaviour toggles.
//! - [input]: key bindings per action.
//! - [log]: log level and log file location.

pub mod general;
pub mod input;
pub mod load;
pub mod log;

pub(crate) use general::{General, InternalGeneral};
pub(crate) use input::Keys;
pub(crate) use load::Config;
pub(crate) use log::LogSettings;
