//! Command-line argument handling for fnav.
//!
//! With no arguments fnav opens the current directory. A single non-flag
//! argument names the directory to open instead.

use crate::config::Config;

use std::path::Path;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CliAction {
    RunApp,
    RunAppAtPath(String),
    Exit,
    /// Exit with a non-zero status; the error has already been printed.
    Fail,
}

pub(crate) fn handle_args() -> CliAction {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args(&args)
}

fn parse_args(args: &[String]) -> CliAction {
    let Some(first) = args.first() else {
        return CliAction::RunApp;
    };

    if args.len() > 1 {
        eprintln!("Error: fnav accepts only one argument at a time.");
        eprintln!("Usage: fnav [PATH] or fnav [OPTION]");
        return CliAction::Fail;
    }

    match first.as_str() {
        "--version" | "-v" => {
            print_version();
            CliAction::Exit
        }
        "-h" | "--help" => {
            print_help();
            CliAction::Exit
        }
        "--init" => init_config(&Config::default_path()),
        arg if !arg.starts_with('-') && !arg.trim().is_empty() => {
            CliAction::RunAppAtPath(arg.to_string())
        }
        arg => {
            eprintln!("Unknown argument: {}", arg);
            eprintln!("Try --help for available options");
            CliAction::Fail
        }
    }
}

fn init_config(path: &Path) -> CliAction {
    match Config::generate_default(path) {
        Ok(()) => CliAction::Exit,
        Err(e) => {
            eprintln!("Error: {}", e);
            CliAction::Fail
        }
    }
}

fn print_version() {
    println!("fnav {}", env!("CARGO_PKG_VERSION"));
}

fn print_help() {
    println!(
        r#"fnav - a small terminal file navigator

USAGE:
  fnav [PATH]

PATH:
  Directory to open (defaults to current directory)

OPTIONS:
      --init              Write a default configuration file
  -h, --help              Print help information
  -v, --version           Print the installed version

KEYS:
  j/k, Up/Down            Move the cursor
  l, Right, Enter         Open directory
  h, Left, Backspace      Parent directory
  space                   Select / unselect entry
  a                       Select all (again to restore)
  d                       Delete selection
  c / m                   Copy / move selection
  n                       New directory
  f                       Filter (regex, matched from the start of the name)
  . / t / r               Toggle hidden, time sort, reverse
  Ctrl+r                  Refresh
  q, Esc                  Quit

ENVIRONMENT:
  FNAV_CONFIG             Override the default config path
  FNAV_LOG                Log filter, e.g. "debug" or "fnav=trace"
"#
    );
}
