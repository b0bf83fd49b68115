use std::fmt;
use std::str::FromStr;

use crate::hex::{hex_decode, hex_to_string};
use crate::HashError;

/// The identity of a stored object: the SHA-1 digest of its framed bytes.
///
/// Rendered as 40 lowercase hex characters for display and arguments, and
/// embedded as the raw 20 bytes inside tree entries.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; ObjectId::LEN]);

impl ObjectId {
    /// Length of the raw digest in bytes.
    pub const LEN: usize = 20;
    /// Length of the hex representation.
    pub const HEX_LEN: usize = Self::LEN * 2;
    /// The null OID (all zeros).
    pub const NULL: Self = Self([0u8; Self::LEN]);

    /// Wrap an already computed digest.
    pub const fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Create an ObjectId from a raw byte slice of exactly 20 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        let arr: [u8; Self::LEN] =
            bytes
                .try_into()
                .map_err(|_| HashError::InvalidHashLength {
                    expected: Self::LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    /// Create an ObjectId from a 40-character hex string (either case).
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        if hex.len() != Self::HEX_LEN {
            return Err(HashError::InvalidHexLength {
                expected: Self::HEX_LEN,
                actual: hex.len(),
            });
        }
        let mut bytes = [0u8; Self::LEN];
        hex_decode(hex, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes of the hash.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Check if this is the null (all-zeros) OID.
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Get the hex string representation (lowercase).
    pub fn to_hex(&self) -> String {
        hex_to_string(&self.0)
    }

    /// Check if this OID's hex representation starts with the given hex prefix.
    pub fn starts_with_hex(&self, prefix: &str) -> bool {
        self.to_hex().starts_with(&prefix.to_ascii_lowercase())
    }

    /// Get the loose object path component: `"xx/xxxx..."`.
    pub fn loose_path(&self) -> String {
        let hex = self.to_hex();
        format!("{}/{}", &hex[..2], &hex[2..])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", &self.to_hex()[..8])
    }
}

impl FromStr for ObjectId {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for ObjectId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SHA1_HEX: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    #[test]
    fn display_roundtrip() {
        let oid = ObjectId::from_hex(SHA1_HEX).unwrap();
        let displayed = oid.to_string();
        assert_eq!(displayed, SHA1_HEX);
        let parsed: ObjectId = displayed.parse().unwrap();
        assert_eq!(parsed, oid);
    }

    #[test]
    fn debug_shows_short_hash() {
        let oid = ObjectId::from_hex(SHA1_HEX).unwrap();
        assert_eq!(format!("{:?}", oid), "ObjectId(da39a3ee)");
    }

    #[test]
    fn ordering() {
        let a = ObjectId::from_hex("0000000000000000000000000000000000000001").unwrap();
        let b = ObjectId::from_hex("0000000000000000000000000000000000000002").unwrap();
        assert!(a < b);
    }

    #[test]
    fn hashmap_key() {
        let oid = ObjectId::from_hex(SHA1_HEX).unwrap();
        let mut map = HashMap::new();
        map.insert(oid, "value");
        assert_eq!(map.get(&oid), Some(&"value"));
    }

    #[test]
    fn null_oid() {
        assert!(ObjectId::NULL.is_null());
        assert!(!ObjectId::from_hex(SHA1_HEX).unwrap().is_null());
    }

    #[test]
    fn from_bytes() {
        let oid = ObjectId::from_hex(SHA1_HEX).unwrap();
        let reconstructed = ObjectId::from_bytes(oid.as_bytes()).unwrap();
        assert_eq!(oid, reconstructed);
    }

    #[test]
    fn from_bytes_wrong_length() {
        let err = ObjectId::from_bytes(&[0; 10]).unwrap_err();
        assert!(matches!(err, HashError::InvalidHashLength { expected: 20, actual: 10 }));
    }

    #[test]
    fn invalid_hex_chars() {
        let err = ObjectId::from_hex("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz").unwrap_err();
        assert!(matches!(err, HashError::InvalidHex { position: 0, .. }));
    }

    #[test]
    fn invalid_hex_length() {
        let err = ObjectId::from_hex("abcd").unwrap_err();
        assert!(matches!(err, HashError::InvalidHexLength { expected: 40, actual: 4 }));
    }

    #[test]
    fn case_insensitive_hex_decode() {
        let lower = ObjectId::from_hex(SHA1_HEX).unwrap();
        let upper = ObjectId::from_hex(&SHA1_HEX.to_ascii_uppercase()).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(upper.to_hex(), SHA1_HEX);
    }

    #[test]
    fn starts_with_hex_prefix() {
        let oid = ObjectId::from_hex(SHA1_HEX).unwrap();
        assert!(oid.starts_with_hex("da39"));
        assert!(oid.starts_with_hex("DA39"));
        assert!(!oid.starts_with_hex("abcd"));
    }

    #[test]
    fn loose_path() {
        let oid = ObjectId::from_hex(SHA1_HEX).unwrap();
        assert_eq!(oid.loose_path(), format!("da/{}", &SHA1_HEX[2..]));
        assert_eq!(oid.loose_path().len(), 41);
    }
}
