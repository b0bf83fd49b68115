use std::io::{self, Write};

use anyhow::Result;
use bstr::{BStr, BString, ByteSlice, ByteVec};
use clap::Args;
use mgit_hash::ObjectId;
use mgit_object::TreeEntry;
use mgit_repository::Repository;

use crate::Cli;
use super::{entry_type, open_repo};

#[derive(Args)]
pub struct LsTreeArgs {
    /// Recurse into sub-trees
    #[arg(short = 'r')]
    recurse: bool,

    /// Show only trees (directories)
    #[arg(short = 'd')]
    trees_only: bool,

    /// Show only names
    #[arg(long)]
    name_only: bool,

    /// NUL line terminator
    #[arg(short = 'z')]
    nul_terminated: bool,

    /// Tree to list
    #[arg(value_name = "tree")]
    tree: String,
}

pub fn run(args: &LsTreeArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let oid = repo.resolve(&args.tree)?;
    list_tree(&repo, &oid, BStr::new(""), args, &mut out)?;

    Ok(0)
}

fn list_tree(
    repo: &Repository,
    tree_oid: &ObjectId,
    prefix: &BStr,
    args: &LsTreeArgs,
    out: &mut impl Write,
) -> Result<()> {
    let tree = repo.list_tree(tree_oid)?;

    for entry in tree.iter() {
        let mut full_path = BString::from(prefix);
        if !full_path.is_empty() {
            full_path.push_byte(b'/');
        }
        full_path.push_str(&entry.name);

        let is_tree = entry.mode.is_tree();
        if is_tree && args.recurse {
            // -d still lists the tree itself, then its subtrees.
            if args.trees_only {
                print_entry(entry, full_path.as_bstr(), args, out)?;
            }
            list_tree(repo, &entry.oid, full_path.as_bstr(), args, out)?;
        } else if args.trees_only && !is_tree {
            continue;
        } else {
            print_entry(entry, full_path.as_bstr(), args, out)?;
        }
    }

    Ok(())
}

fn print_entry(
    entry: &TreeEntry,
    full_path: &BStr,
    args: &LsTreeArgs,
    out: &mut impl Write,
) -> Result<()> {
    if !args.name_only {
        write!(
            out,
            "{:06o} {} {}\t",
            entry.mode.raw(),
            entry_type(entry),
            entry.oid.to_hex(),
        )?;
    }
    out.write_all(full_path)?;
    out.write_all(if args.nul_terminated { b"\0" } else { b"\n" })?;
    Ok(())
}
