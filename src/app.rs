//! Session driver for fnav.
//!
//! - [state]: [AppState], the central state of a running session.
//! - [actions]: prompt modes and the input buffer.
//! - [keymap]: key parsing and key to action mapping.
//! - [handlers]: what each action and prompt does.

pub mod actions;
pub mod handlers;
pub mod keymap;
pub mod state;

pub(crate) use actions::{ActionContext, ActionMode, InputMode};
pub(crate) use state::{AppState, KeypressResult};
