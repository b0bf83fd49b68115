//! Object model for mgit: framing, blobs, and trees.
//!
//! Every stored object is a framed buffer `"<type> <size>\0<payload>"` and is
//! identified by the SHA-1 of that whole buffer. This crate provides the two
//! object shapes (`Blob` and `Tree`), the framing helpers in [`header`], and
//! the `Object` enum tying them together.

mod blob;
pub mod header;
mod tree;

pub use blob::Blob;
pub use tree::{FileMode, Tree, TreeEntry};

use bstr::BString;
use mgit_hash::hasher::Hasher;
use mgit_hash::{HashError, ObjectId};

/// Errors produced by object operations.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("invalid object type: {0}")]
    InvalidType(BString),

    #[error("invalid object frame: {0}")]
    InvalidFrame(String),

    #[error("invalid tree entry at offset {offset}: {reason}")]
    InvalidTreeEntry { offset: usize, reason: String },

    #[error("invalid file mode: {0}")]
    InvalidFileMode(String),

    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ObjectError {
    /// Whether this error describes a malformed frame (bad header, unknown
    /// type, or a declared length that does not match the payload).
    pub fn is_invalid_frame(&self) -> bool {
        matches!(self, Self::InvalidFrame(_) | Self::InvalidType(_))
    }
}

/// The two object shapes the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    /// Raw leaf content.
    Blob,
    /// A directory listing referencing other objects by id.
    Tree,
}

impl ObjectType {
    /// Parse from the type token in a frame header.
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        match s {
            b"blob" => Ok(Self::Blob),
            b"tree" => Ok(Self::Tree),
            _ => Err(ObjectError::InvalidType(BString::from(s))),
        }
    }

    /// The canonical byte representation.
    pub fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObjectType {
    type Err = ObjectError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

/// A parsed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
}

impl Object {
    /// Parse from a framed buffer (header + payload).
    pub fn parse(data: &[u8]) -> Result<Self, ObjectError> {
        let (obj_type, payload) = header::split_frame(data)?;
        Self::parse_content(obj_type, payload)
    }

    /// Parse from payload bytes with known type (no header).
    pub fn parse_content(obj_type: ObjectType, content: &[u8]) -> Result<Self, ObjectError> {
        match obj_type {
            ObjectType::Blob => Ok(Self::Blob(Blob::parse(content))),
            ObjectType::Tree => Ok(Self::Tree(Tree::parse(content)?)),
        }
    }

    /// Serialize to the framed form (header + payload).
    pub fn serialize(&self) -> Vec<u8> {
        header::frame(self.object_type(), &self.serialize_content())
    }

    /// Serialize just the payload (no header).
    pub fn serialize_content(&self) -> Vec<u8> {
        match self {
            Self::Blob(b) => b.serialize_content().to_vec(),
            Self::Tree(t) => t.serialize_content(),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Blob(_) => ObjectType::Blob,
            Self::Tree(_) => ObjectType::Tree,
        }
    }

    /// Compute the OID by hashing the framed form.
    pub fn compute_oid(&self) -> Result<ObjectId, HashError> {
        Hasher::hash_object(self.object_type().as_str(), &self.serialize_content())
    }
}
