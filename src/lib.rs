//! Internal library crate for fnav.
//!
//! The shipped application is the `fnav` binary (`src/main.rs`).
//!
//! The [crate::core] module is the listing engine: [crate::core::Listing] holds one
//! directory view with its selection, options and filter, and runs the
//! delete/copy/move/mkdir operations on it. The remaining modules are the
//! terminal front end built on top of it.

pub mod app;
pub mod config;
pub mod core;
pub mod ui;
pub mod utils;
