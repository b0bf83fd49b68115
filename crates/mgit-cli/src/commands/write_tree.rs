use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::Cli;
use super::open_repo;

#[derive(Args)]
pub struct WriteTreeArgs {
    /// Directory to snapshot (default: the work tree root)
    #[arg(value_name = "path")]
    path: Option<PathBuf>,
}

pub fn run(args: &WriteTreeArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;

    let oid = match &args.path {
        Some(path) => repo.build_tree(path)?,
        None => repo.build_work_tree()?,
    };

    writeln!(io::stdout().lock(), "{}", oid.to_hex())?;
    Ok(0)
}
