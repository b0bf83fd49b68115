use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use mgit_hash::hasher::Hasher;
use mgit_hash::ObjectId;
use mgit_object::{header, Object, ObjectType};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{LooseError, LooseObjectStore};

impl LooseObjectStore {
    /// Store an already framed buffer under `oid`.
    ///
    /// No-op if a readable copy of the object already exists. A stored copy
    /// that fails to read back as [`LooseError::Corrupt`] is replaced.
    /// Otherwise the compressed bytes go to a temp file next to the
    /// destination which is then renamed into place, so readers never
    /// observe a partial object. The caller is responsible for `oid` being
    /// the digest of `framed`.
    pub fn put(&self, oid: &ObjectId, framed: &[u8]) -> Result<(), LooseError> {
        let final_path = self.object_path(oid);
        if self.contains(oid) {
            match self.get(oid) {
                Ok(_) => {
                    debug!(%oid, "object already stored");
                    return Ok(());
                }
                Err(LooseError::Corrupt { reason, .. }) => {
                    warn!(%oid, %reason, "replacing corrupt object");
                    remove_stale(&final_path)?;
                }
                Err(LooseError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        let fanout_dir = final_path
            .parent()
            .unwrap_or(self.objects_dir.as_path());
        fs::create_dir_all(fanout_dir)?;

        let tmp = write_to_temp(fanout_dir, framed, self.compression_level)?;
        finalize_object(tmp, &final_path)?;
        debug!(%oid, size = framed.len(), "stored object");
        Ok(())
    }

    /// Write an object to the store. Returns the OID.
    pub fn write(&self, obj: &Object) -> Result<ObjectId, LooseError> {
        let content = obj.serialize_content();
        self.write_raw(obj.object_type(), &content)
    }

    /// Frame `content` under `obj_type`, store it, and return its OID.
    ///
    /// No-op if the object already exists (idempotent).
    pub fn write_raw(&self, obj_type: ObjectType, content: &[u8]) -> Result<ObjectId, LooseError> {
        let framed = header::frame(obj_type, content);
        let oid = Hasher::digest(&framed)?;
        self.put(&oid, &framed)?;
        Ok(oid)
    }
}

/// Compress `framed` into a temp file under `dir`.
///
/// The temp file is deleted when dropped, so every early return cleans up.
fn write_to_temp(
    dir: &Path,
    framed: &[u8],
    level: flate2::Compression,
) -> Result<NamedTempFile, LooseError> {
    let mut tmp = tempfile::Builder::new()
        .prefix("tmp_obj_")
        .tempfile_in(dir)?;

    let mut encoder = ZlibEncoder::new(tmp.as_file_mut(), level);
    encoder.write_all(framed)?;
    encoder.finish()?;

    // Objects are immutable once written.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o444))?;
    }

    Ok(tmp)
}

/// Delete an unreadable stored object so a fresh copy can take its place.
fn remove_stale(path: &Path) -> Result<(), LooseError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Atomically move a temp file to its final destination.
///
/// If the destination already exists (race with another writer), the temp file
/// is dropped and the write is treated as successful.
fn finalize_object(tmp: NamedTempFile, final_path: &Path) -> Result<(), LooseError> {
    match tmp.persist(final_path) {
        Ok(_) => Ok(()),
        Err(_) if final_path.is_file() => Ok(()),
        Err(e) => Err(LooseError::Io(e.error)),
    }
}
