//! Hashing and compression of loose objects
//!
//! Pure functions, no I/O:
//!
//! - `frame`: prefix a payload with its `"<type> <len>\0"` header
//! - `hash`: SHA-1 of a framed payload
//! - `compress` / `decompress`: zlib (DEFLATE) for the on-disk bytes
//! - `split_header`: parse a framed buffer back into type and payload

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{KitError, Result};
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};

/// Prefix a payload with the loose-object header
pub fn frame(object_type: ObjectType, payload: &[u8]) -> Bytes {
    let header = format!("{} {}\0", object_type.as_str(), payload.len());

    let mut framed = Vec::with_capacity(header.len() + payload.len());
    framed.extend_from_slice(header.as_bytes());
    framed.extend_from_slice(payload);

    Bytes::from(framed)
}

/// SHA-1 of arbitrary bytes
pub fn digest(data: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(data);

    ObjectId::from_digest(hasher.finalize().into())
}

/// Object ID of a payload of the given type
pub fn hash(object_type: ObjectType, payload: &[u8]) -> ObjectId {
    digest(&frame(object_type, payload))
}

pub fn compress(data: &[u8]) -> Result<Bytes> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;

    Ok(encoder.finish()?.into())
}

pub fn decompress(data: &[u8]) -> Result<Bytes> {
    let mut decoder = flate2::read::ZlibDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;

    Ok(decompressed.into())
}

/// Split a framed object into its type and payload
///
/// The declared length must match the payload length.
pub fn split_header(oid: &ObjectId, framed: &Bytes) -> Result<(ObjectType, Bytes)> {
    let nul = framed
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| KitError::corrupt_object(oid.as_ref(), "missing header terminator"))?;

    let header = std::str::from_utf8(&framed[..nul])
        .map_err(|_| KitError::corrupt_object(oid.as_ref(), "header is not UTF-8"))?;
    let (object_type, declared_len) = header
        .split_once(' ')
        .ok_or_else(|| KitError::corrupt_object(oid.as_ref(), "malformed header"))?;

    let object_type = ObjectType::try_from(object_type)?;
    let declared_len = declared_len
        .parse::<usize>()
        .map_err(|_| KitError::corrupt_object(oid.as_ref(), "invalid declared length"))?;

    let payload = framed.slice(nul + 1..);
    if payload.len() != declared_len {
        return Err(KitError::corrupt_object(
            oid.as_ref(),
            format!(
                "declared length {declared_len} does not match payload length {}",
                payload.len()
            ),
        ));
    }

    Ok((object_type, payload))
}
