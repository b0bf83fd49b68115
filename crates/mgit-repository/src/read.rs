use bstr::BString;
use mgit_hash::ObjectId;
use mgit_object::{header, ObjectType, Tree};

use crate::{RepoError, Repository};

/// Shortest abbreviated id accepted by [`Repository::resolve`].
const MIN_ABBREV: usize = 4;

/// A stored object with its frame removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    pub kind: ObjectType,
    pub data: Vec<u8>,
}

impl Repository {
    /// Fetch an object and strip its frame.
    pub fn read_object(&self, oid: &ObjectId) -> Result<RawObject, RepoError> {
        let framed = self.store().get(oid)?;
        let (kind, payload) = header::split_frame(&framed)?;
        Ok(RawObject {
            kind,
            data: payload.to_vec(),
        })
    }

    /// Type and payload size of an object, decompressing only its header.
    pub fn object_header(&self, oid: &ObjectId) -> Result<(ObjectType, usize), RepoError> {
        Ok(self.store().read_header(oid)?)
    }

    /// Read and parse a tree object. Entries come back in stored order.
    pub fn list_tree(&self, oid: &ObjectId) -> Result<Tree, RepoError> {
        let raw = self.read_object(oid)?;
        if raw.kind != ObjectType::Tree {
            return Err(RepoError::NotATree {
                oid: *oid,
                actual: raw.kind,
            });
        }
        Ok(Tree::parse(&raw.data)?)
    }

    /// Entry names of a tree object, in stored order.
    pub fn list_tree_names(&self, oid: &ObjectId) -> Result<Vec<BString>, RepoError> {
        Ok(self
            .list_tree(oid)?
            .entries
            .into_iter()
            .map(|e| e.name)
            .collect())
    }

    /// Resolve a full or abbreviated hex id to a stored object id.
    ///
    /// A full 40-character id is returned as-is, stored or not. Shorter
    /// prefixes (at least 4 characters) must match exactly one stored object.
    pub fn resolve(&self, name: &str) -> Result<ObjectId, RepoError> {
        if name.len() == ObjectId::HEX_LEN {
            return ObjectId::from_hex(name).map_err(|_| RepoError::UnknownObject(name.into()));
        }
        if name.len() < MIN_ABBREV
            || name.len() > ObjectId::HEX_LEN
            || !name.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(RepoError::UnknownObject(name.into()));
        }

        let mut found = None;
        for oid in self.store().iter()? {
            let oid = oid?;
            if oid.starts_with_hex(name) {
                if found.is_some() {
                    return Err(RepoError::AmbiguousObject(name.into()));
                }
                found = Some(oid);
            }
        }
        found.ok_or_else(|| RepoError::UnknownObject(name.into()))
    }
}
