//! Input mode and prompt buffer for fnav.
//!
//! [ActionContext] tracks whether the user is browsing or typing into a
//! prompt, and owns the prompt's text buffer and cursor.

/// The current interaction mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ActionMode {
    Normal,
    Input { mode: InputMode, prompt: String },
}

/// What the prompt's input is used for once confirmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputMode {
    Copy,
    MoveFile,
    NewFolder,
    Filter,
    ConfirmDelete,
}

impl InputMode {
    /// Prompt label shown in the footer.
    pub(crate) fn prompt(self, count: usize) -> String {
        match self {
            InputMode::Copy => format!("Copy {} item(s) to: ", count),
            InputMode::MoveFile => format!("Move {} item(s) to: ", count),
            InputMode::NewFolder => "New directory: ".to_string(),
            InputMode::Filter => "Filter: ".to_string(),
            InputMode::ConfirmDelete => format!("Delete {} item(s)? [y/N] ", count),
        }
    }
}

/// Prompt state: mode, text buffer and cursor (a char index).
#[derive(Debug)]
pub(crate) struct ActionContext {
    mode: ActionMode,
    input_buffer: String,
    input_cursor_pos: usize,
}

impl Default for ActionContext {
    fn default() -> Self {
        Self {
            mode: ActionMode::Normal,
            input_buffer: String::new(),
            input_cursor_pos: 0,
        }
    }
}

impl ActionContext {
    // Accessors

    #[inline]
    pub(crate) fn mode(&self) -> &ActionMode {
        &self.mode
    }

    #[inline]
    pub(crate) fn input_mode(&self) -> Option<InputMode> {
        match &self.mode {
            ActionMode::Input { mode, .. } => Some(*mode),
            ActionMode::Normal => None,
        }
    }

    #[inline]
    pub(crate) fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    #[inline]
    pub(crate) fn input_cursor_pos(&self) -> usize {
        self.input_cursor_pos
    }

    // Mode changes

    /// Enters `mode` with the buffer preset to `initial` and the cursor at its end.
    pub(crate) fn enter_mode(&mut self, mode: InputMode, prompt: String, initial: &str) {
        self.mode = ActionMode::Input { mode, prompt };
        self.input_buffer = initial.to_string();
        self.input_cursor_pos = initial.chars().count();
    }

    pub(crate) fn exit_mode(&mut self) {
        self.mode = ActionMode::Normal;
        self.input_buffer.clear();
        self.input_cursor_pos = 0;
    }

    // Buffer editing

    pub(crate) fn insert_at_cursor(&mut self, c: char) {
        let byte_pos = self.byte_pos();
        self.input_buffer.insert(byte_pos, c);
        self.input_cursor_pos += 1;
    }

    pub(crate) fn backspace_at_cursor(&mut self) {
        if self.input_cursor_pos == 0 {
            return;
        }
        self.input_cursor_pos -= 1;
        let byte_pos = self.byte_pos();
        self.input_buffer.remove(byte_pos);
    }

    pub(crate) fn delete_at_cursor(&mut self) {
        if self.input_cursor_pos < self.input_buffer.chars().count() {
            let byte_pos = self.byte_pos();
            self.input_buffer.remove(byte_pos);
        }
    }

    pub(crate) fn move_cursor_left(&mut self) {
        self.input_cursor_pos = self.input_cursor_pos.saturating_sub(1);
    }

    pub(crate) fn move_cursor_right(&mut self) {
        if self.input_cursor_pos < self.input_buffer.chars().count() {
            self.input_cursor_pos += 1;
        }
    }

    pub(crate) fn cursor_home(&mut self) {
        self.input_cursor_pos = 0;
    }

    pub(crate) fn cursor_end(&mut self) {
        self.input_cursor_pos = self.input_buffer.chars().count();
    }

    fn byte_pos(&self) -> usize {
        self.input_buffer
            .char_indices()
            .nth(self.input_cursor_pos)
            .map_or(self.input_buffer.len(), |(i, _)| i)
    }
}
