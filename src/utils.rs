//! Miscellaneous utilities for fnav.
//!
//! - [cli]: command line argument handling.
//! - [logging]: tracing subscriber setup.
//! - [helpers]: path expansion, normalisation and display helpers.

pub mod cli;
pub mod helpers;
pub mod logging;

pub use helpers::{
    expand_home_path, get_home, normalize_path, sanitize_to_exact_width, shorten_home_path,
};
