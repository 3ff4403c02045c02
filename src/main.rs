//! main.rs
//! Entry point for fnav

pub(crate) mod app;
pub(crate) mod config;
pub(crate) mod core;
pub(crate) mod ui;
pub(crate) mod utils;

use crate::app::AppState;
use crate::config::Config;
use crate::core::terminal;
use crate::utils::cli::{CliAction, handle_args};
use crate::utils::logging::init_logging;

use std::path::Path;

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = crossterm::execute!(
            stdout,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        tracing::error!(%info, "panic");
        eprintln!("\n[fnav] Error occurred: {}", info);

        #[cfg(debug_assertions)]
        {
            let bt = std::backtrace::Backtrace::force_capture();
            eprintln!("\nStack Backtrace:\n{}", bt);
        }
    }));

    let action = handle_args();
    match action {
        CliAction::Exit => return Ok(()),
        CliAction::Fail => std::process::exit(1),
        CliAction::RunApp | CliAction::RunAppAtPath(_) => {}
    }

    let config = Config::load();
    init_logging(config.log());

    let app = match &action {
        CliAction::RunAppAtPath(path_arg) => {
            let target = Path::new(path_arg);
            if !target.is_dir() {
                eprintln!("Error: '{}' is not a directory", path_arg);
                std::process::exit(1);
            }
            AppState::from_dir(&config, target)
        }
        _ => AppState::new(&config),
    };

    let mut app = match app {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "cannot open directory");
            eprintln!("[fnav] Error: {}", e);
            std::process::exit(1);
        }
    };

    terminal::run_terminal(&mut app)
}
