use std::path::PathBuf;

use mgit_hash::{HashError, ObjectId};
use mgit_loose::LooseError;
use mgit_object::{ObjectError, ObjectType};

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("not a git repository (or any of the parent directories): {}", .0.display())]
    NotARepository(PathBuf),

    #[error("invalid git directory: {}: {reason}", path.display())]
    InvalidGitDir { path: PathBuf, reason: String },

    #[error("unable to read HEAD: {0}")]
    InvalidHead(String),

    #[error("'{0}' is not a valid branch name")]
    InvalidBranchName(String),

    #[error("repository has no working tree")]
    NoWorkTree,

    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("file name is not representable as bytes: {}", .0.display())]
    InvalidFileName(PathBuf),

    #[error("symbolic link cycle at {}", .0.display())]
    SymlinkCycle(PathBuf),

    #[error("object {oid} is a {actual}, not a tree")]
    NotATree { oid: ObjectId, actual: ObjectType },

    #[error("not a valid object name: {0}")]
    UnknownObject(String),

    #[error("short object ID {0} is ambiguous")]
    AmbiguousObject(String),

    #[error(transparent)]
    Store(#[from] LooseError),

    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RepoError {
    /// The requested object is not in the store.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(LooseError::NotFound(_)))
    }

    /// A stored object failed to decompress or has a bad frame.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Store(LooseError::Corrupt { .. }))
    }

    /// A framed buffer handed to the object layer was malformed.
    pub fn is_invalid_frame(&self) -> bool {
        matches!(self, Self::Object(e) if e.is_invalid_frame())
    }
}
