mod commands;
mod config;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{error::ErrorKind, Parser};
use tracing_subscriber::EnvFilter;

use commands::Commands;

/// Environment variable holding the log filter, e.g. `MGIT_LOG=debug`.
const LOG_ENV: &str = "MGIT_LOG";

#[derive(Parser)]
#[command(
    name = "mgit",
    about = "A minimal content-addressable object store",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Run as if started in <path>
    #[arg(short = 'C', global = true)]
    change_dir: Option<PathBuf>,

    /// Set a configuration value (key=value)
    #[arg(short = 'c', global = true)]
    config: Vec<String>,

    /// Set the path to the .git directory
    #[arg(long = "git-dir", global = true)]
    git_dir: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
                _ => process::exit(128),
            }
        }
    };

    if let Some(dir) = &cli.change_dir {
        if let Err(e) = std::env::set_current_dir(dir) {
            eprintln!("fatal: cannot change to '{}': {}", dir.display(), e);
            process::exit(128);
        }
    }

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("fatal: {e}");
            process::exit(128);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    commands::run(cli)
}
