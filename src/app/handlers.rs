//! Input action handlers for fnav.
//!
//! [AppState] methods that process key events in normal mode and inside
//! prompts. Every filesystem mutation is followed by a refresh and a status
//! line message.

use crate::app::actions::InputMode;
use crate::app::keymap::{FileAction, NavAction, ViewAction};
use crate::app::state::{AppState, KeypressResult};
use crate::core::Result;

use crossterm::event::{KeyCode::*, KeyEvent};

impl<'a> AppState<'a> {
    /// Handles key events while a prompt is open.
    pub(super) fn handle_input_mode(&mut self, key: KeyEvent) -> KeypressResult {
        let Some(mode) = self.actions.input_mode() else {
            return KeypressResult::Continue;
        };

        if mode == InputMode::ConfirmDelete {
            self.actions.exit_mode();
            if matches!(key.code, Char('y') | Char('Y')) {
                self.delete_selection();
            } else {
                self.set_status("delete cancelled");
            }
            return KeypressResult::Consumed;
        }

        match key.code {
            Enter => {
                let input = self.actions.input_buffer().to_string();
                self.actions.exit_mode();
                match mode {
                    InputMode::Copy => self.copy_selection(&input),
                    InputMode::MoveFile => self.move_selection(&input),
                    InputMode::NewFolder => self.create_folder(&input),
                    InputMode::Filter => self.apply_filter(&input),
                    InputMode::ConfirmDelete => {}
                }
            }
            Esc => self.actions.exit_mode(),
            Left => self.actions.move_cursor_left(),
            Right => self.actions.move_cursor_right(),
            Home => self.actions.cursor_home(),
            End => self.actions.cursor_end(),
            Backspace => self.actions.backspace_at_cursor(),
            Delete => self.actions.delete_at_cursor(),
            Char(c) => self.actions.insert_at_cursor(c),
            _ => {}
        }
        KeypressResult::Consumed
    }

    /// Handles cursor movement, directory changes and selection.
    pub(super) fn handle_nav_action(&mut self, action: NavAction) -> KeypressResult {
        match action {
            NavAction::GoUp => self.cursor = self.cursor.saturating_sub(1),
            NavAction::GoDown => {
                if self.cursor + 1 < self.listing.len() {
                    self.cursor += 1;
                }
            }
            NavAction::GoToTop => self.cursor = 0,
            NavAction::GoToBottom => self.cursor = self.listing.len().saturating_sub(1),
            NavAction::GoIntoDir => match self.listing.enter(self.cursor) {
                Ok(true) => self.cursor = 0,
                Ok(false) => {}
                Err(e) => self.set_status(e.to_string()),
            },
            NavAction::GoParent => match self.listing.go_parent() {
                Ok(Some(child)) => self.cursor = self.listing.position(&child).unwrap_or(0),
                Ok(None) => {}
                Err(e) => self.set_status(e.to_string()),
            },
            NavAction::ToggleSelect => {
                if self.listing.toggle_select(self.cursor) && self.cursor + 1 < self.listing.len() {
                    self.cursor += 1;
                }
            }
            NavAction::SelectAll => self.listing.select_all(),
        }
        KeypressResult::Continue
    }

    /// Opens the prompt for a filesystem mutation.
    pub(super) fn handle_file_action(&mut self, action: FileAction) -> KeypressResult {
        let count = self.listing.selected().len();
        let mode = match action {
            FileAction::Delete => InputMode::ConfirmDelete,
            FileAction::Copy => InputMode::Copy,
            FileAction::MoveFile => InputMode::MoveFile,
            FileAction::CreateDirectory => InputMode::NewFolder,
        };

        if mode != InputMode::NewFolder && count == 0 {
            self.set_status("nothing selected");
            return KeypressResult::Continue;
        }
        if mode == InputMode::ConfirmDelete && !self.config.general().confirm_delete() {
            self.delete_selection();
            return KeypressResult::Continue;
        }

        self.actions.enter_mode(mode, mode.prompt(count), "");
        KeypressResult::Consumed
    }

    /// Handles listing option toggles, the filter prompt and manual refresh.
    pub(super) fn handle_view_action(&mut self, action: ViewAction) -> KeypressResult {
        match action {
            ViewAction::Filter => {
                let current = self.listing.filter().to_string();
                self.actions
                    .enter_mode(InputMode::Filter, InputMode::Filter.prompt(0), &current);
                return KeypressResult::Consumed;
            }
            ViewAction::ToggleHidden => self.listing.toggle_hidden(),
            ViewAction::ToggleSort => self.listing.toggle_sort(),
            ViewAction::ToggleReverse => self.listing.toggle_reverse(),
            ViewAction::Refresh => {}
        }
        self.refresh_listing();
        KeypressResult::Continue
    }

    // Mutations

    fn delete_selection(&mut self) {
        let res = self.listing.delete();
        self.report("deleted", res);
    }

    fn copy_selection(&mut self, dest: &str) {
        let res = self.listing.copy(dest);
        self.report("copied", res);
    }

    fn move_selection(&mut self, dest: &str) {
        let res = self.listing.move_to(dest);
        self.report("moved", res);
    }

    fn create_folder(&mut self, name: &str) {
        match self.listing.make_directory(name) {
            Ok(true) => self.set_status(format!("created {}", name.trim())),
            Ok(false) => self.set_status(format!("{} already exists", name.trim())),
            Err(e) => self.set_status(e.to_string()),
        }
        self.refresh_listing();
    }

    fn apply_filter(&mut self, pattern: &str) {
        match self.listing.set_filter(pattern) {
            Ok(()) => {
                self.cursor = 0;
                self.refresh_listing();
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Shows the outcome of a batch operation and refreshes the view.
    fn report(&mut self, verb: &str, res: Result<usize>) {
        match res {
            Ok(n) => self.set_status(format!("{} item(s) {}", n, verb)),
            Err(e) => self.set_status(e.to_string()),
        }
        self.refresh_listing();
    }

    /// Rebuilds the view, keeping the cursor on the same entry when it survives.
    pub(super) fn refresh_listing(&mut self) {
        let current = self.listing.get(self.cursor).map(|e| e.name().to_os_string());
        if let Err(e) = self.listing.refresh() {
            self.set_status(e.to_string());
        }
        if let Some(pos) = current.and_then(|name| self.listing.position(&name)) {
            self.cursor = pos;
        }
        self.clamp_cursor();
    }
}
