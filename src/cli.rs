use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// jUnit XML reporter for test runner lifecycle events.
#[derive(Parser)]
#[command(name = "junit-reporter", version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print JSON Schema for recorded events.
    Schema,
    /// Replay a recorded event stream and write the jUnit report.
    Replay(ReplayArgs),
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Path to NDJSON event stream.
    #[arg(long, required = true)]
    pub events: PathBuf,

    /// Host configuration file (JSON) with a `junit-reporter` entry.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override report destination (file ending in .xml, or directory).
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Output notifications as JSON lines to stdout.
    #[arg(long)]
    pub json: bool,
}
