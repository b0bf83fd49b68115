use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use mgit_hash::hasher::Hasher;
use mgit_hash::ObjectId;
use mgit_object::{ObjectType, Tree};
use mgit_repository::Repository;

use crate::Cli;
use super::open_repo;

#[derive(Args)]
pub struct HashObjectArgs {
    /// Read the object from stdin
    #[arg(long)]
    stdin: bool,

    /// Actually write the object into the object store
    #[arg(short = 'w')]
    write: bool,

    /// Object type (default: blob)
    #[arg(short = 't', default_value = "blob")]
    obj_type: ObjectType,

    /// Files to hash
    #[arg(value_name = "file")]
    files: Vec<PathBuf>,
}

pub fn run(args: &HashObjectArgs, cli: &Cli) -> Result<i32> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // We only need a repo if writing
    let repo = if args.write { Some(open_repo(cli)?) } else { None };

    if args.stdin {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        let oid = hash_and_maybe_write(&data, args.obj_type, repo.as_ref())?;
        writeln!(out, "{}", oid.to_hex())?;
    }

    for file in &args.files {
        let oid = match (args.obj_type, repo.as_ref()) {
            (ObjectType::Blob, Some(repo)) => repo.build_leaf(file)?,
            (ObjectType::Blob, None) => mgit_repository::hash_file(file)?,
            (obj_type, repo) => {
                let data = std::fs::read(file)?;
                hash_and_maybe_write(&data, obj_type, repo)?
            }
        };
        writeln!(out, "{}", oid.to_hex())?;
    }

    Ok(0)
}

fn hash_and_maybe_write(
    data: &[u8],
    obj_type: ObjectType,
    repo: Option<&Repository>,
) -> Result<ObjectId> {
    // Refuse to create a tree nothing could list.
    if obj_type == ObjectType::Tree {
        Tree::parse(data)?;
    }

    if let Some(repo) = repo {
        Ok(repo.store().write_raw(obj_type, data)?)
    } else {
        Ok(Hasher::hash_object(obj_type.as_str(), data)?)
    }
}
