//! The object frame: `"<type> <size>\0<payload>"`.

use crate::{ObjectError, ObjectType};

/// Write a frame header: `"<type> <size>\0"`.
pub fn write_header(obj_type: ObjectType, content_size: usize) -> Vec<u8> {
    format!("{} {}\0", obj_type, content_size).into_bytes()
}

/// Build the full framed buffer for `payload`. Any payload is valid, including
/// an empty one.
pub fn frame(obj_type: ObjectType, payload: &[u8]) -> Vec<u8> {
    let hdr = write_header(obj_type, payload.len());
    let mut out = Vec::with_capacity(hdr.len() + payload.len());
    out.extend_from_slice(&hdr);
    out.extend_from_slice(payload);
    out
}

/// Parse a frame header from raw bytes.
///
/// Returns `(type, content_size, header_length)` where `header_length`
/// includes the null terminator. Only the header is inspected; see
/// [`split_frame`] to also check the payload length.
pub fn parse_header(data: &[u8]) -> Result<(ObjectType, usize, usize), ObjectError> {
    let null_pos = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| ObjectError::InvalidFrame("missing null terminator".into()))?;

    let header = &data[..null_pos];
    let space_pos = header
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| ObjectError::InvalidFrame("missing space in header".into()))?;

    let obj_type = ObjectType::from_bytes(&header[..space_pos])?;

    let size_bytes = &header[space_pos + 1..];
    if size_bytes.is_empty() || !size_bytes.iter().all(u8::is_ascii_digit) {
        return Err(ObjectError::InvalidFrame(format!(
            "invalid size: {}",
            String::from_utf8_lossy(size_bytes)
        )));
    }
    // All ASCII digits, so the only possible failure is overflow.
    let content_size = std::str::from_utf8(size_bytes)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| ObjectError::InvalidFrame("size out of range".into()))?;

    Ok((obj_type, content_size, null_pos + 1))
}

/// Split a framed buffer into its type and payload.
///
/// The declared size must equal the payload length exactly.
pub fn split_frame(data: &[u8]) -> Result<(ObjectType, &[u8]), ObjectError> {
    let (obj_type, declared, header_len) = parse_header(data)?;
    let payload = &data[header_len..];
    if payload.len() != declared {
        return Err(ObjectError::InvalidFrame(format!(
            "declared size {declared} but payload is {} bytes",
            payload.len()
        )));
    }
    Ok((obj_type, payload))
}
