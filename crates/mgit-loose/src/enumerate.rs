use std::fs;
use std::path::{Path, PathBuf};

use mgit_hash::ObjectId;

use crate::{LooseError, LooseObjectStore};

/// Iterator over stored object OIDs, in ascending order.
///
/// Walks the fan-out directories (`00`–`ff`) and yields each valid OID.
/// Temp files and anything else that is not 38 hex characters are skipped.
pub struct LooseObjectIter {
    /// Sorted fan-out directories still to visit, as (prefix, path).
    dirs: std::vec::IntoIter<(String, PathBuf)>,
    /// OIDs from the current fan-out directory, sorted.
    current: std::vec::IntoIter<ObjectId>,
}

impl LooseObjectIter {
    fn new(objects_dir: &Path) -> Result<Self, LooseError> {
        let mut dirs = Vec::new();
        if objects_dir.is_dir() {
            for entry in fs::read_dir(objects_dir)? {
                let entry = entry?;
                let name = entry.file_name();
                let Some(name) = name.to_str() else { continue };
                if name.len() == 2
                    && name.bytes().all(|b| b.is_ascii_hexdigit())
                    && entry.file_type()?.is_dir()
                {
                    dirs.push((name.to_ascii_lowercase(), entry.path()));
                }
            }
        }
        dirs.sort();

        Ok(Self {
            dirs: dirs.into_iter(),
            current: Vec::new().into_iter(),
        })
    }

    fn load_dir(prefix: &str, path: &Path) -> Result<Vec<ObjectId>, LooseError> {
        let mut oids = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Ok(oid) = ObjectId::from_hex(&format!("{prefix}{name}")) {
                oids.push(oid);
            }
        }
        oids.sort();
        Ok(oids)
    }
}

impl Iterator for LooseObjectIter {
    type Item = Result<ObjectId, LooseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(oid) = self.current.next() {
                return Some(Ok(oid));
            }
            let (prefix, path) = self.dirs.next()?;
            match Self::load_dir(&prefix, &path) {
                Ok(oids) => self.current = oids.into_iter(),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl LooseObjectStore {
    /// Iterate over all stored object OIDs.
    pub fn iter(&self) -> Result<LooseObjectIter, LooseError> {
        LooseObjectIter::new(&self.objects_dir)
    }
}
