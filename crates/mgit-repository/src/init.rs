use std::fs;
use std::path::Path;

use crate::{DiscoveredRepo, InitOptions, RepoError, CONTROL_DIR, DEFAULT_BRANCH};

/// Initialize a new repository under `path`.
///
/// Creates:
/// - .git/HEAD (pointing to the default branch)
/// - .git/objects/
/// - .git/refs/heads/
///
/// If `HEAD` already exists nothing is touched.
pub fn init_repository(path: &Path, options: &InitOptions) -> Result<DiscoveredRepo, RepoError> {
    let path = if path.is_relative() {
        std::env::current_dir()?.join(path)
    } else {
        path.to_path_buf()
    };
    let git_dir = path.join(CONTROL_DIR);

    if git_dir.join("HEAD").is_file() {
        tracing::debug!(git_dir = %git_dir.display(), "repository exists, reinit is a no-op");
        return Ok(DiscoveredRepo {
            git_dir,
            work_tree: Some(path),
        });
    }

    let branch = options.default_branch.as_deref().unwrap_or(DEFAULT_BRANCH);
    validate_branch_name(branch)?;

    fs::create_dir_all(git_dir.join("objects"))?;
    fs::create_dir_all(git_dir.join("refs").join("heads"))?;
    fs::write(git_dir.join("HEAD"), format!("ref: refs/heads/{branch}\n"))?;
    tracing::debug!(git_dir = %git_dir.display(), branch, "initialized repository");

    Ok(DiscoveredRepo {
        git_dir,
        work_tree: Some(path),
    })
}

/// Characters that may not appear anywhere in a branch name.
const FORBIDDEN_CHARS: &[u8] = b" ~^:?*[\\";

/// The subset of `git check-ref-format --branch` rules that matter for a
/// name written into `HEAD`.
fn validate_branch_name(name: &str) -> Result<(), RepoError> {
    let bytes = name.as_bytes();
    let bad = bytes.is_empty()
        || name == "@"
        || name.starts_with('-')
        || name.starts_with('/')
        || name.ends_with('/')
        || name.ends_with('.')
        || name.contains("..")
        || name.contains("//")
        || name.contains("@{")
        || bytes
            .iter()
            .any(|&b| b < 0x20 || b == 0x7f || FORBIDDEN_CHARS.contains(&b))
        || name
            .split('/')
            .any(|c| c.starts_with('.') || c.ends_with(".lock"));
    if bad {
        return Err(RepoError::InvalidBranchName(name.to_string()));
    }
    Ok(())
}
