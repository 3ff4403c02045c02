//! UI renderer implementation.
//!
//! Pure rendering: reads the app state and produces widgets. Nothing in here
//! touches the filesystem or mutates the listing.

use crate::app::{ActionMode, AppState};
use crate::core::{ColorClass, EntryInfo, IdentityLookup};
use crate::utils::{sanitize_to_exact_width, shorten_home_path};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

const SELECTED_MARKER: &str = "*";

/// Draws the whole screen for one frame.
pub(crate) fn render(frame: &mut Frame, app: &AppState) {
    let [header, body, footer] = layout_chunks(frame.area());

    render_header(frame, app, header);
    render_entries(frame, app, body);
    render_footer(frame, app, footer);
}

/// Splits the screen into header, entry list and footer.
pub(crate) fn layout_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

fn render_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let listing = app.listing();
    let mut spans = vec![Span::styled(
        shorten_home_path(listing.cwd()),
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
    )];

    let flags = listing.options().flags();
    if !flags.is_empty() {
        spans.push(Span::raw(format!(" [-{}]", flags)));
    }
    if !listing.filter().is_empty() {
        spans.push(Span::styled(
            format!(" filter: {}", listing.filter()),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_entries(frame: &mut Frame, app: &AppState, area: Rect) {
    let listing = app.listing();
    let width = area.width as usize;
    let height = area.height as usize;
    if height == 0 {
        return;
    }

    if listing.is_empty() {
        let line = Line::styled(
            sanitize_to_exact_width("  (empty)", width),
            Style::default().add_modifier(Modifier::DIM),
        );
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let offset = scroll_offset(app.cursor(), height);
    let lines: Vec<Line> = listing
        .view()
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(idx, entry)| {
            let text = entry_line(entry, listing.is_selected(idx), listing.identity());
            let mut style = class_style(entry.color_class());
            if idx == app.cursor() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::styled(sanitize_to_exact_width(&text, width), style)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let actions = app.actions();
    if let ActionMode::Input { prompt, .. } = actions.mode() {
        let buffer = actions.input_buffer();
        let line = Line::from(vec![
            Span::styled(prompt.as_str(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(buffer),
        ]);
        frame.render_widget(Paragraph::new(line), area);

        let before_cursor: String = buffer.chars().take(actions.input_cursor_pos()).collect();
        let x = area.x as usize + prompt.width() + before_cursor.width();
        let max_x = area.x as usize + area.width.saturating_sub(1) as usize;
        frame.set_cursor_position((x.min(max_x) as u16, area.y));
        return;
    }

    let listing = app.listing();
    let text = match app.status() {
        Some(msg) => msg.to_string(),
        None => {
            let mut s = format!("{} entries", listing.len());
            if !listing.selected().is_empty() {
                s.push_str(&format!(", {} selected", listing.selected().len()));
            }
            if !listing.skipped().is_empty() {
                s.push_str(&format!(", {} unreadable", listing.skipped().len()));
            }
            s
        }
    };
    let line = Line::styled(
        sanitize_to_exact_width(&text, area.width as usize),
        Style::default().add_modifier(Modifier::REVERSED),
    );
    frame.render_widget(Paragraph::new(line), area);
}

/// First visible row so that `cursor` stays on screen.
pub(crate) fn scroll_offset(cursor: usize, height: usize) -> usize {
    if height == 0 {
        return cursor;
    }
    (cursor + 1).saturating_sub(height)
}

/// The text of one entry row: marker, `ls -l` columns, name.
pub(crate) fn entry_line(entry: &EntryInfo, selected: bool, ids: &dyn IdentityLookup) -> String {
    let marker = if selected { SELECTED_MARKER } else { " " };
    let mut name = entry.name_str().into_owned();
    if entry.is_dir() {
        name.push('/');
    }
    format!("{} {} {}", marker, entry.row(ids), name)
}

fn class_style(class: ColorClass) -> Style {
    let style = Style::default();
    match class {
        ColorClass::Directory => style.fg(Color::Blue).add_modifier(Modifier::BOLD),
        ColorClass::Symlink => style.fg(Color::Cyan),
        ColorClass::Executable => style.fg(Color::Green),
        ColorClass::Pipe => style.fg(Color::Yellow),
        ColorClass::Socket => style.fg(Color::Magenta),
        ColorClass::BlockDevice | ColorClass::CharDevice => {
            style.fg(Color::Yellow).add_modifier(Modifier::BOLD)
        }
        ColorClass::Unknown => style.fg(Color::Red),
        ColorClass::File => style,
    }
}
