use std::fs;
use std::io::{ErrorKind, Read};

use flate2::read::ZlibDecoder;
use flate2::{Decompress, FlushDecompress, Status};
use mgit_hash::ObjectId;
use mgit_object::{header, Object, ObjectType};

use crate::{LooseError, LooseObjectStore};

impl LooseObjectStore {
    /// Check if an object exists.
    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }

    /// Read an object and return its full framed buffer.
    ///
    /// Fails with [`LooseError::NotFound`] if no file exists for `oid`, and
    /// with [`LooseError::Corrupt`] if the file does not inflate to a complete
    /// zlib stream or the inflated bytes are not a well-formed frame whose
    /// declared size matches its payload.
    pub fn get(&self, oid: &ObjectId) -> Result<Vec<u8>, LooseError> {
        let compressed = self.read_compressed(oid)?;
        let framed = inflate(&compressed, oid)?;
        header::split_frame(&framed).map_err(|e| LooseError::corrupt(oid, e.to_string()))?;
        Ok(framed)
    }

    /// Read and parse an object.
    pub fn read(&self, oid: &ObjectId) -> Result<Object, LooseError> {
        let framed = self.get(oid)?;
        Ok(Object::parse(&framed)?)
    }

    /// Read just the header (type + size) without inflating the full content.
    pub fn read_header(&self, oid: &ObjectId) -> Result<(ObjectType, usize), LooseError> {
        let compressed = self.read_compressed(oid)?;

        // Headers are at most "tree " plus 20 digits plus NUL, so 64 bytes is plenty.
        let mut decoder = ZlibDecoder::new(&compressed[..]);
        let mut buf = [0u8; 64];
        let mut filled = 0;

        loop {
            if filled >= buf.len() {
                return Err(LooseError::corrupt(oid, "header exceeds 64 bytes"));
            }
            let n = decoder
                .read(&mut buf[filled..])
                .map_err(|e| LooseError::corrupt(oid, format!("inflate failed: {e}")))?;
            if n == 0 {
                return Err(LooseError::corrupt(
                    oid,
                    "unexpected EOF before header null terminator",
                ));
            }
            filled += n;
            if buf[..filled].contains(&0) {
                break;
            }
        }

        let (obj_type, content_size, _header_len) = header::parse_header(&buf[..filled])
            .map_err(|e| LooseError::corrupt(oid, e.to_string()))?;
        Ok((obj_type, content_size))
    }

    fn read_compressed(&self, oid: &ObjectId) -> Result<Vec<u8>, LooseError> {
        match fs::read(self.object_path(oid)) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(LooseError::NotFound(*oid)),
            Err(e) => Err(LooseError::Io(e)),
        }
    }
}

/// Inflate a complete zlib stream.
///
/// Unlike reading through `ZlibDecoder`, running out of input before the
/// stream end (including a missing checksum trailer) is an error here rather
/// than a short read.
fn inflate(compressed: &[u8], oid: &ObjectId) -> Result<Vec<u8>, LooseError> {
    let mut z = Decompress::new(true);
    let mut out = Vec::with_capacity(compressed.len().saturating_mul(2).max(64));

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
        }
        let in_before = z.total_in();
        let out_before = z.total_out();
        let consumed = usize::try_from(in_before).unwrap_or(compressed.len());
        let input = compressed.get(consumed..).unwrap_or_default();

        let status = z
            .decompress_vec(input, &mut out, FlushDecompress::None)
            .map_err(|e| LooseError::corrupt(oid, format!("inflate failed: {e}")))?;

        if status == Status::StreamEnd {
            return Ok(out);
        }
        if z.total_in() == in_before && z.total_out() == out_before {
            let reason = if input.is_empty() {
                "truncated zlib stream"
            } else {
                "zlib stream stalled"
            };
            return Err(LooseError::corrupt(oid, reason));
        }
    }
}
