//! Lowercase hex encoding and case-insensitive decoding of digests.

use crate::HashError;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Value of a single hex digit, or `None` for anything else.
const fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Hex-encode `bytes` to a new lowercase `String`.
pub fn hex_to_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX_DIGITS[(b >> 4) as usize] as char);
        out.push(HEX_DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

/// Decode a hex string into `buf`. The hex string length must be exactly `buf.len() * 2`.
pub fn hex_decode(hex: &str, buf: &mut [u8]) -> Result<(), HashError> {
    let hex = hex.as_bytes();
    if hex.len() != buf.len() * 2 {
        return Err(HashError::InvalidHexLength {
            expected: buf.len() * 2,
            actual: hex.len(),
        });
    }
    for (i, pair) in hex.chunks_exact(2).enumerate() {
        let digit = |offset: usize| {
            nibble(pair[offset]).ok_or(HashError::InvalidHex {
                position: i * 2 + offset,
                character: pair[offset] as char,
            })
        };
        buf[i] = (digit(0)? << 4) | digit(1)?;
    }
    Ok(())
}

/// Check if a string is valid hexadecimal (even length, all hex chars).
pub fn is_valid_hex(s: &str) -> bool {
    s.len() % 2 == 0 && s.bytes().all(|b| nibble(b).is_some())
}
