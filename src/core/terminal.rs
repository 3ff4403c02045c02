//! Terminal setup and event loop for fnav.
//!
//! Handles setup/teardown of raw mode and the alternate screen, redraws,
//! and dispatching key and resize events to the app.

use crate::app::{AppState, KeypressResult};
use crate::ui;

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use std::io;

/// Puts the terminal in raw mode on the alternate screen and runs the event
/// loop until the user quits. The terminal is restored even if the loop fails.
pub(crate) fn run_terminal(app: &mut AppState) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    result
}

/// Draws, then blocks on the next event. Redraws only after a key press or
/// a resize, so an idle session does no work.
fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState) -> io::Result<()>
where
    io::Error: From<<B as Backend>::Error>,
{
    terminal.draw(|f| ui::render(f, app))?;
    loop {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.handle_keypress(key) == KeypressResult::Quit {
                    break;
                }
                terminal.draw(|f| ui::render(f, app))?;
            }
            Event::Resize(_, _) => {
                terminal.draw(|f| ui::render(f, app))?;
            }
            _ => {}
        }
    }
    Ok(())
}
