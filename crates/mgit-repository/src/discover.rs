use std::path::Path;

use crate::env::EnvOverrides;
use crate::{DiscoveredRepo, RepoError, CONTROL_DIR};

/// Discover a repository by walking up from `start`.
///
/// 1. `$GIT_DIR`, if set, is used directly (relative to `start`).
/// 2. Otherwise each directory from `start` upwards is checked for a
///    `.git` control directory, then for being a control directory itself.
pub fn discover_git_dir(start: &Path, env: &EnvOverrides) -> Result<DiscoveredRepo, RepoError> {
    if let Some(ref git_dir) = env.git_dir {
        let git_dir = if git_dir.is_absolute() {
            git_dir.clone()
        } else {
            start.join(git_dir)
        };
        return open_git_dir(&git_dir);
    }

    let start = std::fs::canonicalize(start)
        .map_err(|_| RepoError::NotARepository(start.to_path_buf()))?;

    let mut current = start.as_path();
    loop {
        let dot_git = current.join(CONTROL_DIR);
        if is_git_dir(&dot_git) {
            tracing::debug!(git_dir = %dot_git.display(), "discovered repository");
            return Ok(DiscoveredRepo {
                git_dir: dot_git,
                work_tree: Some(current.to_path_buf()),
            });
        }

        if is_git_dir(current) {
            return open_git_dir(current);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return Err(RepoError::NotARepository(start.clone())),
        }
    }
}

/// Open a known control directory path directly.
pub fn open_git_dir(git_dir: &Path) -> Result<DiscoveredRepo, RepoError> {
    let git_dir = std::fs::canonicalize(git_dir)
        .map_err(|_| RepoError::NotARepository(git_dir.to_path_buf()))?;

    if !is_git_dir(&git_dir) {
        return Err(RepoError::InvalidGitDir {
            path: git_dir,
            reason: "missing HEAD or objects/".to_string(),
        });
    }

    // A control dir named `.git` whose parent points back at it is inside a
    // work tree; anything else has none.
    let work_tree = git_dir
        .parent()
        .filter(|parent| parent.join(CONTROL_DIR) == git_dir)
        .map(Path::to_path_buf);

    Ok(DiscoveredRepo { git_dir, work_tree })
}

/// Open the control directory of a known work tree root.
pub fn open_git_dir_from_work_tree(work_tree: &Path) -> Result<DiscoveredRepo, RepoError> {
    let work_tree = std::fs::canonicalize(work_tree)
        .map_err(|_| RepoError::NotARepository(work_tree.to_path_buf()))?;
    let git_dir = work_tree.join(CONTROL_DIR);

    if !is_git_dir(&git_dir) {
        return Err(RepoError::InvalidGitDir {
            path: git_dir,
            reason: "missing HEAD or objects/".to_string(),
        });
    }

    Ok(DiscoveredRepo {
        git_dir,
        work_tree: Some(work_tree),
    })
}

/// Check if a directory looks like a control directory (has HEAD and objects/).
pub fn is_git_dir(path: &Path) -> bool {
    path.join("HEAD").is_file() && path.join("objects").is_dir()
}
