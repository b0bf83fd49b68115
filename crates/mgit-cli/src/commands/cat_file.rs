use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Args;
use mgit_object::{ObjectType, Tree};

use crate::Cli;
use super::{entry_type, open_repo};

#[derive(Args)]
pub struct CatFileArgs {
    /// Show object type
    #[arg(short = 't', conflicts_with_all = ["size", "pretty", "exists"])]
    type_only: bool,

    /// Show object size
    #[arg(short = 's', conflicts_with_all = ["type_only", "pretty", "exists"])]
    size: bool,

    /// Pretty-print the object content
    #[arg(short = 'p', conflicts_with_all = ["type_only", "size", "exists"])]
    pretty: bool,

    /// Exit with zero status if the object exists and is valid
    #[arg(short = 'e', conflicts_with_all = ["type_only", "size", "pretty"])]
    exists: bool,

    /// Positional args: either <object> (with -t/-s/-p/-e) or <type> <object>
    #[arg(value_name = "arg", required = true, num_args = 1..=2)]
    positional: Vec<String>,
}

pub fn run(args: &CatFileArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let flagged = args.type_only || args.size || args.pretty || args.exists;
    let (expected_type, object_str) = match args.positional.as_slice() {
        [object] if flagged => (None, object.as_str()),
        [ty, object] if !flagged => {
            let parsed: ObjectType = ty
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid object type \"{ty}\""))?;
            (Some(parsed), object.as_str())
        }
        _ => bail!("usage: mgit cat-file (-t | -s | -p | -e | <type>) <object>"),
    };

    if args.exists {
        let found = repo
            .resolve(object_str)
            .and_then(|oid| repo.object_header(&oid));
        return Ok(if found.is_ok() { 0 } else { 1 });
    }

    let oid = repo.resolve(object_str)?;

    if args.type_only {
        let (obj_type, _) = repo.object_header(&oid)?;
        writeln!(out, "{obj_type}")?;
        return Ok(0);
    }

    if args.size {
        let (_, size) = repo.object_header(&oid)?;
        writeln!(out, "{size}")?;
        return Ok(0);
    }

    let raw = repo.read_object(&oid)?;

    if let Some(expected) = expected_type {
        if raw.kind != expected {
            bail!("{object_str}: bad file: expected {expected} but got {}", raw.kind);
        }
        out.write_all(&raw.data)?;
        return Ok(0);
    }

    match raw.kind {
        ObjectType::Blob => out.write_all(&raw.data)?,
        ObjectType::Tree => pretty_print_tree(&Tree::parse(&raw.data)?, &mut out)?,
    }
    Ok(0)
}

/// One line per entry: `<mode> <type> <hex>\t<name>`.
fn pretty_print_tree(tree: &Tree, out: &mut impl Write) -> Result<()> {
    for entry in tree.iter() {
        write!(
            out,
            "{:06o} {} {}\t",
            entry.mode.raw(),
            entry_type(entry),
            entry.oid.to_hex(),
        )?;
        out.write_all(&entry.name)?;
        writeln!(out)?;
    }
    Ok(())
}
