use std::cmp::Ordering;

use bstr::{BStr, BString, ByteSlice};
use mgit_hash::ObjectId;

use crate::{ObjectError, ObjectType};

/// File mode for tree entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileMode {
    /// Regular file (100644)
    Regular,
    /// Subdirectory (040000)
    Tree,
}

impl FileMode {
    /// Parse from octal ASCII bytes. Both `040000` and git's unpadded
    /// `40000` are accepted for directories.
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        let invalid = || ObjectError::InvalidFileMode(String::from_utf8_lossy(s).into());
        match parse_octal(s).ok_or_else(invalid)? {
            0o100644 => Ok(Self::Regular),
            0o040000 => Ok(Self::Tree),
            _ => Err(invalid()),
        }
    }

    /// The bytes written into a tree payload. Directories keep the leading
    /// zero.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Regular => b"100644",
            Self::Tree => b"040000",
        }
    }

    /// Get the raw numeric value.
    pub fn raw(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Tree => 0o040000,
        }
    }

    /// Is this a tree (directory) entry?
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree)
    }

    /// Is this a blob (file) entry?
    pub fn is_blob(&self) -> bool {
        matches!(self, Self::Regular)
    }

    /// Type of the object an entry with this mode points at.
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Regular => ObjectType::Blob,
            Self::Tree => ObjectType::Tree,
        }
    }
}

fn parse_octal(s: &[u8]) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut val: u32 = 0;
    for &b in s {
        if !(b'0'..=b'7').contains(&b) {
            return None;
        }
        val = val.checked_mul(8)?.checked_add(u32::from(b - b'0'))?;
    }
    Some(val)
}

/// A single entry in a tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: BString,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: impl Into<BString>, oid: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            oid,
        }
    }

    /// Serialize as `<mode> <name>\0<20 raw id bytes>`.
    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.mode.as_bytes());
        out.push(b' ');
        out.extend_from_slice(&self.name);
        out.push(0);
        out.extend_from_slice(self.oid.as_bytes());
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Plain byte-wise order on the name. Directories get no implicit trailing
/// `/`, so `foo` sorts before `foo-bar` whatever its mode. Mode and id only
/// break ties between entries that share a name.
impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .as_bytes()
            .cmp(other.name.as_bytes())
            .then_with(|| self.mode.cmp(&other.mode))
            .then_with(|| self.oid.cmp(&other.oid))
    }
}

/// A tree object: one directory's listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from entries in any order; they are sorted by name.
    pub fn from_entries(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort();
        Self { entries }
    }

    /// Parse tree content from binary format.
    ///
    /// Each entry is: `<mode-ascii> <name>\0<oid-bytes>`. Entries are returned
    /// in stored order.
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < content.len() {
            let space_pos = content[pos..]
                .find_byte(b' ')
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "missing space after mode".into(),
                })?
                + pos;

            let mode = FileMode::from_bytes(&content[pos..space_pos]).map_err(|_| {
                ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "invalid mode".into(),
                }
            })?;

            let name_start = space_pos + 1;
            let null_pos = content[name_start..]
                .find_byte(0)
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: name_start,
                    reason: "missing null after name".into(),
                })?
                + name_start;

            let name = BString::from(&content[name_start..null_pos]);

            let oid_start = null_pos + 1;
            let oid_end = oid_start + ObjectId::LEN;
            if oid_end > content.len() {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: oid_start,
                    reason: "truncated OID".into(),
                });
            }
            let oid = ObjectId::from_bytes(&content[oid_start..oid_end])?;

            entries.push(TreeEntry { mode, name, oid });
            pos = oid_end;
        }

        Ok(Self { entries })
    }

    /// Serialize tree content to binary format.
    ///
    /// Entries are always written sorted by name, whatever order they are
    /// held in.
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut sorted: Vec<&TreeEntry> = self.entries.iter().collect();
        sorted.sort();

        let mut out = Vec::new();
        for entry in sorted {
            entry.write_to(&mut out);
        }
        out
    }

    pub fn sort(&mut self) {
        self.entries.sort();
    }

    /// Lookup an entry by name.
    pub fn find(&self, name: &BStr) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_bstr() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    /// Entry names in held order.
    pub fn names(&self) -> impl Iterator<Item = &BStr> {
        self.entries.iter().map(|e| e.name.as_bstr())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
