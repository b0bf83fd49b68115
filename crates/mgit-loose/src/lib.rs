//! Compressed object store: read, write, and enumerate zlib-compressed objects.
//!
//! Each object lives at `<root>/objects/XX/YYYY...` where `XX` is the first
//! byte of the OID in hex and `YYYY...` is the remaining 38 hex characters.
//! The file content is the zlib-compressed frame `"<type> <size>\0<content>"`.
//! Paths are derived from the OID on every call; the store keeps no index.

mod enumerate;
mod read;
mod write;

pub use enumerate::LooseObjectIter;

use mgit_hash::ObjectId;
use std::path::{Path, PathBuf};

/// Interface to the object directory (`.git/objects/`).
#[derive(Debug, Clone)]
pub struct LooseObjectStore {
    /// Path to the objects directory.
    objects_dir: PathBuf,
    /// Zlib compression level.
    compression_level: flate2::Compression,
}

impl LooseObjectStore {
    /// Open the object store at the given path. The directory is not touched
    /// until the first read or write.
    pub fn open(objects_dir: impl AsRef<Path>) -> Self {
        Self {
            objects_dir: objects_dir.as_ref().to_path_buf(),
            compression_level: flate2::Compression::default(),
        }
    }

    /// Set the zlib compression level (0–9). Larger values are clamped to 9.
    pub fn set_compression_level(&mut self, level: u32) {
        self.compression_level = flate2::Compression::new(level.min(9));
    }

    pub fn compression_level(&self) -> u32 {
        self.compression_level.level()
    }

    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Get the file path for a given OID.
    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.objects_dir.join(oid.loose_path())
    }
}

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum LooseError {
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    #[error("corrupt object {oid}: {reason}")]
    Corrupt { oid: ObjectId, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("object parse error: {0}")]
    Object(#[from] mgit_object::ObjectError),

    #[error("hash error: {0}")]
    Hash(#[from] mgit_hash::HashError),
}

impl LooseError {
    pub(crate) fn corrupt(oid: &ObjectId, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            oid: *oid,
            reason: reason.into(),
        }
    }
}
