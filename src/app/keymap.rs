//! Key mapping and action dispatch for fnav.
//!
//! Maps key strings from the config onto [Action]s. The parsing accepts both
//! the `<c-x>` bracket form and the `ctrl+x` form.

use crate::config::Config;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Any action reachable from a key in normal mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Nav(NavAction),
    File(FileAction),
    View(ViewAction),
    System(SystemAction),
}

/// Cursor movement, directory changes and selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum NavAction {
    GoUp,
    GoDown,
    GoToTop,
    GoToBottom,
    GoIntoDir,
    GoParent,
    ToggleSelect,
    SelectAll,
}

/// Filesystem mutations, all of which prompt first.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FileAction {
    Delete,
    Copy,
    MoveFile,
    CreateDirectory,
}

/// Listing options and filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ViewAction {
    Filter,
    ToggleHidden,
    ToggleSort,
    ToggleReverse,
    Refresh,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum SystemAction {
    Quit,
}

/// Key + modifiers as used in the keymap
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub(crate) struct Key {
    pub(crate) code: KeyCode,
    pub(crate) modifiers: KeyModifiers,
}

/// Mapping from [Key] to [Action], built from the config.
#[derive(Debug)]
pub(crate) struct Keymap {
    map: HashMap<Key, Action>,
}

impl Keymap {
    #[rustfmt::skip]
    pub(crate) fn from_config(config: &Config) -> Self {
        let mut map = HashMap::new();
        let keys = config.keys();

        macro_rules! bind {
            ($keys:expr, $action:expr) => {
                bind($keys, $action, &mut map);
            };
        }

        use NavAction as N;
        use FileAction as F;
        use ViewAction as V;

        bind!(keys.go_up(),             Action::Nav(N::GoUp));
        bind!(keys.go_down(),           Action::Nav(N::GoDown));
        bind!(keys.go_to_top(),         Action::Nav(N::GoToTop));
        bind!(keys.go_to_bottom(),      Action::Nav(N::GoToBottom));
        bind!(keys.go_into_dir(),       Action::Nav(N::GoIntoDir));
        bind!(keys.go_parent(),         Action::Nav(N::GoParent));
        bind!(keys.toggle_select(),     Action::Nav(N::ToggleSelect));
        bind!(keys.select_all(),        Action::Nav(N::SelectAll));

        bind!(keys.delete(),            Action::File(F::Delete));
        bind!(keys.copy(),              Action::File(F::Copy));
        bind!(keys.move_file(),         Action::File(F::MoveFile));
        bind!(keys.create_directory(),  Action::File(F::CreateDirectory));

        bind!(keys.filter(),            Action::View(V::Filter));
        bind!(keys.toggle_hidden(),     Action::View(V::ToggleHidden));
        bind!(keys.toggle_sort(),       Action::View(V::ToggleSort));
        bind!(keys.toggle_reverse(),    Action::View(V::ToggleReverse));
        bind!(keys.refresh(),           Action::View(V::Refresh));

        bind!(keys.quit(),              Action::System(SystemAction::Quit));

        Keymap { map }
    }

    /// Looks up the action for a key event.
    ///
    /// Terminals report `G` as shift+`G`; if the exact lookup fails the shift
    /// modifier is dropped for character keys.
    pub(crate) fn lookup(&self, key: KeyEvent) -> Option<Action> {
        let k = Key {
            code: key.code,
            modifiers: key.modifiers,
        };

        if let Some(action) = self.map.get(&k).copied() {
            return Some(action);
        }

        if matches!(key.code, KeyCode::Char(_)) && key.modifiers.contains(KeyModifiers::SHIFT) {
            let k2 = Key {
                code: key.code,
                modifiers: key.modifiers - KeyModifiers::SHIFT,
            };
            return self.map.get(&k2).copied();
        }
        None
    }
}

/// Parses a key string such as `"j"`, `"Up"`, `"Ctrl+r"` or `"<c-r>"`.
pub(crate) fn parse_key(s: &str) -> Option<Key> {
    let mut modifiers = KeyModifiers::NONE;
    let mut code: Option<KeyCode> = None;

    // a bare "+" or "-" is the key itself, not a separator
    if s == "+" || s == "-" {
        return s.chars().next().map(|c| Key {
            code: KeyCode::Char(c),
            modifiers,
        });
    }

    let is_bracketed = s.starts_with('<') && s.ends_with('>') && s.len() > 2;
    let mut input = if is_bracketed {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    };

    if is_bracketed && input.contains('-') {
        let parts: Vec<&str> = input.split('-').collect();

        for &prefix in parts.iter().take(parts.len().saturating_sub(1)) {
            match prefix.to_lowercase().as_str() {
                "c" | "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "a" | "m" | "alt" => modifiers |= KeyModifiers::ALT,
                "s" | "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }
        input = parts.last()?.to_string();
    }

    for part in input.split('+') {
        let p_low = part.to_lowercase();
        match p_low.as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" | "meta" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,

            "up" => code = Some(KeyCode::Up),
            "down" => code = Some(KeyCode::Down),
            "left" => code = Some(KeyCode::Left),
            "right" => code = Some(KeyCode::Right),
            "home" => code = Some(KeyCode::Home),
            "end" => code = Some(KeyCode::End),
            "enter" => code = Some(KeyCode::Enter),
            "esc" => code = Some(KeyCode::Esc),
            "backspace" | "back" => code = Some(KeyCode::Backspace),
            "tab" => code = Some(KeyCode::Tab),
            "space" | "spc" | " " => code = Some(KeyCode::Char(' ')),

            _ => {
                if part.chars().count() == 1 {
                    let mut c = part.chars().next()?;
                    if modifiers.contains(KeyModifiers::SHIFT) {
                        c = c.to_ascii_uppercase();
                    }
                    code = Some(KeyCode::Char(c));
                } else if p_low.starts_with('f')
                    && p_low.len() > 1
                    && p_low[1..].chars().all(|c| c.is_ascii_digit())
                {
                    let n = p_low[1..].parse().ok()?;
                    code = Some(KeyCode::F(n));
                } else if part.is_empty() {
                    continue;
                } else {
                    return None;
                }
            }
        }
    }

    Some(Key {
        code: code?,
        modifiers,
    })
}

fn bind(key_list: &[String], action: Action, map: &mut HashMap<Key, Action>) {
    for k in key_list {
        match parse_key(k) {
            Some(key) => {
                map.insert(key, action);
            }
            None => tracing::warn!(key = %k, ?action, "ignoring unparsable key binding"),
        }
    }
}
