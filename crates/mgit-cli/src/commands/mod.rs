pub mod cat_file;
pub mod hash_object;
pub mod init;
pub mod ls_tree;
pub mod write_tree;

use anyhow::Result;
use clap::Subcommand;
use mgit_object::TreeEntry;
use mgit_repository::Repository;

use crate::config::Settings;
use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty repository or reinitialize an existing one
    Init(init::InitArgs),
    /// Compute object ID and optionally store a blob from a file
    HashObject(hash_object::HashObjectArgs),
    /// Provide content or type and size information for stored objects
    CatFile(cat_file::CatFileArgs),
    /// List the contents of a tree object
    LsTree(ls_tree::LsTreeArgs),
    /// Snapshot a directory into tree objects
    WriteTree(write_tree::WriteTreeArgs),
}

/// Open a repository, respecting --git-dir and -c overrides.
pub fn open_repo(cli: &Cli) -> Result<Repository> {
    let mut repo = if let Some(ref git_dir) = cli.git_dir {
        Repository::open(git_dir)?
    } else {
        Repository::discover(".")?
    };

    let settings = Settings::from_args(&cli.config)?;
    if let Some(level) = settings.loose_level() {
        repo.store_mut().set_compression_level(level);
    }
    Ok(repo)
}

/// Object type an entry points at, as printed in listings.
fn entry_type(entry: &TreeEntry) -> &'static str {
    entry.mode.object_type().as_str()
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Init(args) => init::run(args, &cli),
        Commands::HashObject(args) => hash_object::run(args, &cli),
        Commands::CatFile(args) => cat_file::run(args, &cli),
        Commands::LsTree(args) => ls_tree::run(args, &cli),
        Commands::WriteTree(args) => write_tree::run(args, &cli),
    }
}
