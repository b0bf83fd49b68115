//! Repository layout and the snapshot operations built on the object store.
//!
//! A repository is a control directory (`.git`) holding `HEAD`, `refs/`, and
//! the `objects/` store, normally placed at the root of a work tree. This
//! crate finds or creates that layout, turns files and directories into
//! stored objects, and reads objects back.

mod build;
mod discover;
mod env;
mod error;
mod init;
mod read;

pub use build::hash_file;
pub use env::EnvOverrides;
pub use error::RepoError;
pub use read::RawObject;

use std::path::{Path, PathBuf};

use mgit_loose::LooseObjectStore;

/// Name of the control directory. Never included in a snapshot.
pub const CONTROL_DIR: &str = ".git";

/// Branch `HEAD` points at after `init` unless told otherwise.
pub const DEFAULT_BRANCH: &str = "main";

/// Result of repository discovery before full opening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredRepo {
    pub git_dir: PathBuf,
    /// `None` when the control directory is not inside a work tree.
    pub work_tree: Option<PathBuf>,
}

/// Options for repository initialization.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Branch written into `HEAD`. Defaults to [`DEFAULT_BRANCH`].
    pub default_branch: Option<String>,
}

/// An opened repository: its paths plus the object store.
#[derive(Debug)]
pub struct Repository {
    /// Path to the .git directory.
    git_dir: PathBuf,
    /// Path to the working tree (None when opened from a detached control dir).
    work_tree: Option<PathBuf>,
    store: LooseObjectStore,
}

impl Repository {
    /// Open an existing repository at the given path.
    ///
    /// `path` should point to either the `.git` directory or the working tree root.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        Self::open_with_env(path, &EnvOverrides::from_env())
    }

    /// Like [`Repository::open`], with explicit environment overrides.
    pub fn open_with_env(path: impl AsRef<Path>, env: &EnvOverrides) -> Result<Self, RepoError> {
        let path = path.as_ref();
        let discovered = if discover::is_git_dir(path) {
            discover::open_git_dir(path)?
        } else if path.join(CONTROL_DIR).exists() {
            discover::open_git_dir_from_work_tree(path)?
        } else {
            return Err(RepoError::NotARepository(path.to_path_buf()));
        };
        Ok(Self::from_discovered(discovered, env))
    }

    /// Discover a repository starting from the given directory, walking up.
    ///
    /// `GIT_DIR` short-circuits the walk.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, RepoError> {
        Self::discover_with_env(start, &EnvOverrides::from_env())
    }

    /// Like [`Repository::discover`], with explicit environment overrides.
    pub fn discover_with_env(
        start: impl AsRef<Path>,
        env: &EnvOverrides,
    ) -> Result<Self, RepoError> {
        let discovered = discover::discover_git_dir(start.as_ref(), env)?;
        Ok(Self::from_discovered(discovered, env))
    }

    /// Initialize a new repository at the given path.
    ///
    /// Re-running on an existing repository leaves it untouched.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        Self::init_opts(path, &InitOptions::default())
    }

    /// Initialize a new repository with custom options.
    pub fn init_opts(path: impl AsRef<Path>, opts: &InitOptions) -> Result<Self, RepoError> {
        let discovered = init::init_repository(path.as_ref(), opts)?;
        Ok(Self::from_discovered(discovered, &EnvOverrides::from_env()))
    }

    fn from_discovered(discovered: DiscoveredRepo, env: &EnvOverrides) -> Self {
        let DiscoveredRepo { git_dir, work_tree } = discovered;

        let objects_dir = match env.object_directory {
            Some(ref od) => od.clone(),
            None => git_dir.join("objects"),
        };
        tracing::debug!(
            git_dir = %git_dir.display(),
            objects = %objects_dir.display(),
            "opened repository"
        );

        Repository {
            store: LooseObjectStore::open(objects_dir),
            git_dir,
            work_tree,
        }
    }

    /// Path to the .git directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Path to the working tree, if there is one.
    pub fn work_tree(&self) -> Option<&Path> {
        self.work_tree.as_deref()
    }

    /// Access the object store.
    pub fn store(&self) -> &LooseObjectStore {
        &self.store
    }

    /// Access the object store mutably (compression level).
    pub fn store_mut(&mut self) -> &mut LooseObjectStore {
        &mut self.store
    }

    /// Read the symbolic `HEAD` pointer and return the ref it names,
    /// e.g. `refs/heads/main`.
    pub fn head(&self) -> Result<String, RepoError> {
        let path = self.git_dir.join("HEAD");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| RepoError::InvalidHead(format!("{}: {e}", path.display())))?;
        let target = content
            .strip_suffix('\n')
            .unwrap_or(&content)
            .strip_prefix("ref: ")
            .ok_or_else(|| RepoError::InvalidHead(format!("not a symbolic ref: {content:?}")))?;
        if !target.starts_with("refs/") || target.trim() != target {
            return Err(RepoError::InvalidHead(format!("bad target: {target:?}")));
        }
        Ok(target.to_string())
    }

    /// Name of the branch `HEAD` points at.
    pub fn current_branch(&self) -> Result<String, RepoError> {
        let head = self.head()?;
        Ok(head
            .strip_prefix("refs/heads/")
            .unwrap_or(&head)
            .to_string())
    }
}
