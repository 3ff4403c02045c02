//! Application state and main controller for fnav.
//!
//! [AppState] owns the [Listing] being browsed along with everything the
//! driver adds on top of it: the cursor row, the prompt state, the keymap and
//! the status line. Key events enter through [AppState::handle_keypress].

use crate::app::actions::{ActionContext, ActionMode};
use crate::app::keymap::{Action, Keymap};
use crate::config::Config;
use crate::core::{Listing, ListingError, Operation, Result};

use crossterm::event::{KeyEvent, KeyEventKind};
use tracing::warn;

use std::path::Path;

/// Outcome of a single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeypressResult {
    Continue,
    Consumed,
    Quit,
}

/// Central state of a running fnav session.
pub(crate) struct AppState<'a> {
    pub(super) config: &'a Config,
    pub(super) keymap: Keymap,
    pub(super) listing: Listing,
    pub(super) cursor: usize,
    pub(super) actions: ActionContext,
    pub(super) status: Option<String>,
}

impl<'a> AppState<'a> {
    pub(crate) fn new(config: &'a Config) -> Result<Self> {
        let current_dir = std::env::current_dir()
            .map_err(|e| ListingError::from_io(Operation::Navigate, Path::new("."), e))?;
        Self::from_dir(config, &current_dir)
    }

    /// Opens `dir` with the listing options and initial filter from the config.
    ///
    /// An invalid configured filter is reported in the status line rather
    /// than failing startup.
    pub(crate) fn from_dir(config: &'a Config, dir: &Path) -> Result<Self> {
        let general = config.general();
        let mut listing = Listing::with_options(dir, general.listing_options())?;

        let mut status = None;
        if let Err(e) = listing.set_filter(general.filter()) {
            warn!(error = %e, "ignoring configured filter");
            status = Some(e.to_string());
        }
        listing.refresh()?;

        Ok(Self {
            config,
            keymap: Keymap::from_config(config),
            listing,
            cursor: 0,
            actions: ActionContext::default(),
            status,
        })
    }

    // Accessors

    #[inline]
    pub(crate) fn listing(&self) -> &Listing {
        &self.listing
    }

    #[inline]
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub(crate) fn actions(&self) -> &ActionContext {
        &self.actions
    }

    #[inline]
    pub(crate) fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Dispatches a key event to the prompt or to the keymap.
    pub(crate) fn handle_keypress(&mut self, key: KeyEvent) -> KeypressResult {
        if key.kind == KeyEventKind::Release {
            return KeypressResult::Continue;
        }

        if matches!(self.actions.mode(), ActionMode::Input { .. }) {
            return self.handle_input_mode(key);
        }

        self.status = None;
        match self.keymap.lookup(key) {
            Some(Action::Nav(action)) => self.handle_nav_action(action),
            Some(Action::File(action)) => self.handle_file_action(action),
            Some(Action::View(action)) => self.handle_view_action(action),
            Some(Action::System(_)) => KeypressResult::Quit,
            None => KeypressResult::Continue,
        }
    }

    // Cursor helpers

    pub(super) fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.listing.len().saturating_sub(1));
    }

    pub(super) fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }
}
