//! Key binding options for fnav, read from the `[keys]` section of fnav.toml.
//!
//! Every action takes a list of key strings in the syntax understood by
//! [parse_key](crate::app::keymap::parse_key).

use serde::Deserialize;

/// Key bindings of all actions
#[derive(Deserialize, Debug)]
#[serde(default)]
pub(crate) struct Keys {
    go_up: Vec<String>,
    go_down: Vec<String>,
    go_to_top: Vec<String>,
    go_to_bottom: Vec<String>,
    go_into_dir: Vec<String>,
    go_parent: Vec<String>,
    toggle_select: Vec<String>,
    select_all: Vec<String>,
    delete: Vec<String>,
    copy: Vec<String>,
    move_file: Vec<String>,
    create_directory: Vec<String>,
    filter: Vec<String>,
    toggle_hidden: Vec<String>,
    toggle_sort: Vec<String>,
    toggle_reverse: Vec<String>,
    refresh: Vec<String>,
    quit: Vec<String>,
}

macro_rules! accessor {
    ($($name:ident),+ $(,)?) => {
        impl Keys {
            $(
                #[inline]
                pub(crate) fn $name(&self) -> &[String] {
                    &self.$name
                }
            )+
        }
    };
}

accessor!(
    go_up,
    go_down,
    go_to_top,
    go_to_bottom,
    go_into_dir,
    go_parent,
    toggle_select,
    select_all,
    delete,
    copy,
    move_file,
    create_directory,
    filter,
    toggle_hidden,
    toggle_sort,
    toggle_reverse,
    refresh,
    quit,
);

impl Default for Keys {
    fn default() -> Self {
        Keys {
            go_up: vec!["k".into(), "Up".into()],
            go_down: vec!["j".into(), "Down".into()],
            go_to_top: vec!["g".into(), "Home".into()],
            go_to_bottom: vec!["G".into(), "End".into()],
            go_into_dir: vec!["l".into(), "Right".into(), "Enter".into()],
            go_parent: vec!["h".into(), "Left".into(), "Backspace".into()],

            toggle_select: vec!["space".into()],
            select_all: vec!["a".into()],

            delete: vec!["d".into()],
            copy: vec!["c".into()],
            move_file: vec!["m".into()],
            create_directory: vec!["n".into()],
            filter: vec!["f".into()],

            toggle_hidden: vec![".".into()],
            toggle_sort: vec!["t".into()],
            toggle_reverse: vec!["r".into()],
            refresh: vec!["Ctrl+r".into()],

            quit: vec!["q".into(), "Esc".into()],
        }
    }
}
