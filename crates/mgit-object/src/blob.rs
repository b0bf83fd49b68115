/// A blob: raw file content, stored as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// A blob payload is simply its raw bytes; every byte sequence is valid.
    pub fn parse(content: &[u8]) -> Self {
        Self {
            data: content.to_vec(),
        }
    }

    pub fn serialize_content(&self) -> &[u8] {
        &self.data
    }
}
