//! `junit-reporter` - writes jUnit XML reports from test runner lifecycle events.
//!
//! See `DESIGN.md` for architecture.

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use tracing::Level;

use junit_reporter::cli::{Cli, Command};
use junit_reporter::exit_codes::exit;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Command::Schema => {
            let schema = junit_reporter::events::generate_schema()?;
            println!("{}", schema);
            exit::SUCCESS
        }
        Command::Replay(args) => match junit_reporter::replay::run(args) {
            Ok(code) => code,
            Err(e) => {
                tracing::error!("{e:#}");
                exit::OPERATIONAL_FAILURE
            }
        },
    };
    std::process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}
