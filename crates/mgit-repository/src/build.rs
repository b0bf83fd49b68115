//! Turning files and directories into stored objects.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bstr::{BStr, ByteVec};
use mgit_hash::hasher::Hasher;
use mgit_hash::ObjectId;
use mgit_object::{FileMode, ObjectType, Tree, TreeEntry};
use tracing::{debug, trace};

use crate::{RepoError, Repository, CONTROL_DIR};

impl Repository {
    /// Store the contents of the regular file at `path` as a blob and return
    /// its id. Storing the same bytes again is a no-op.
    pub fn build_leaf(&self, path: impl AsRef<Path>) -> Result<ObjectId, RepoError> {
        let data = read_leaf(path.as_ref())?;
        Ok(self.store().write_raw(ObjectType::Blob, &data)?)
    }

    /// Snapshot the directory at `dir` into a tree of stored objects and
    /// return the root tree id.
    ///
    /// Every file and subdirectory is stored before the tree that lists it.
    /// The control directory is skipped at every level. Any failure aborts
    /// the whole snapshot; objects already stored stay in the store.
    pub fn build_tree(&self, dir: impl AsRef<Path>) -> Result<ObjectId, RepoError> {
        let dir = dir.as_ref();
        let is_dir = fs::metadata(dir).map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            return Err(RepoError::NotADirectory(dir.to_path_buf()));
        }

        let mut ancestors = vec![fs::canonicalize(dir)?];
        self.snapshot_dir(dir, &mut ancestors)
    }

    /// Snapshot the work tree root.
    pub fn build_work_tree(&self) -> Result<ObjectId, RepoError> {
        let work_tree = self.work_tree().ok_or(RepoError::NoWorkTree)?;
        self.build_tree(work_tree)
    }

    /// `ancestors` holds the canonical paths of the directories currently
    /// being snapshotted, used to stop at symlinks pointing back up.
    fn snapshot_dir(
        &self,
        dir: &Path,
        ancestors: &mut Vec<PathBuf>,
    ) -> Result<ObjectId, RepoError> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if name == CONTROL_DIR {
                continue;
            }
            let path = entry.path();

            // Symlinks are classified by what they point at.
            let meta = match fs::metadata(&path) {
                Ok(meta) => meta,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(path = %path.display(), "skipping dangling symlink");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let (mode, oid) = if meta.is_dir() {
                if entry.file_type()?.is_symlink() {
                    let target = fs::canonicalize(&path)?;
                    if ancestors.contains(&target) {
                        return Err(RepoError::SymlinkCycle(path));
                    }
                    ancestors.push(target);
                } else {
                    ancestors.push(fs::canonicalize(&path)?);
                }
                let oid = self.snapshot_dir(&path, ancestors);
                ancestors.pop();
                (FileMode::Tree, oid?)
            } else if meta.is_file() {
                (FileMode::Regular, self.build_leaf(&path)?)
            } else {
                debug!(path = %path.display(), "skipping special file");
                continue;
            };

            let name =
                Vec::<u8>::from_os_string(name).map_err(|_| RepoError::InvalidFileName(path))?;
            trace!(name = %BStr::new(&name), %oid, mode = ?mode, "tree entry");
            entries.push(TreeEntry::new(mode, name, oid));
        }

        let tree = Tree::from_entries(entries);
        let oid = self
            .store()
            .write_raw(ObjectType::Tree, &tree.serialize_content())?;
        debug!(%oid, dir = %dir.display(), entries = tree.len(), "stored tree");
        Ok(oid)
    }
}

/// Compute the blob id of the file at `path` without storing anything. No
/// repository is needed.
pub fn hash_file(path: impl AsRef<Path>) -> Result<ObjectId, RepoError> {
    let data = read_leaf(path.as_ref())?;
    Ok(Hasher::hash_object(ObjectType::Blob.as_str(), &data)?)
}

/// Read a whole regular file. Directories, missing paths, and special files
/// are all `NotAFile`.
fn read_leaf(path: &Path) -> Result<Vec<u8>, RepoError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(fs::read(path)?),
        Ok(_) => Err(RepoError::NotAFile(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(RepoError::NotAFile(path.to_path_buf())),
        Err(e) => Err(e.into()),
    }
}
