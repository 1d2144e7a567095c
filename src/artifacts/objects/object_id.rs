//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character lowercase hexadecimal strings representing
//! SHA-1 digests. They uniquely identify every object in the store.
//!
//! ## Storage
//!
//! Objects are stored in `.kit/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::{OBJECT_ID_LENGTH, RAW_OBJECT_ID_LENGTH};
use crate::errors::{KitError, Result};
use std::io;
use std::path::PathBuf;

/// Object identifier (SHA-1 hash)
///
/// Always holds a validated, lowercase, 40-character hex string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// Uppercase hex digits are accepted and normalized to lowercase.
    pub fn try_parse(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref().trim();

        if !Self::is_full_hex(id) {
            return Err(KitError::InvalidObjectId(id.to_string()));
        }

        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Whether the string looks like a full 40-digit hex object ID
    pub fn is_full_hex(id: &str) -> bool {
        id.len() == OBJECT_ID_LENGTH && id.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Build an object ID from a raw 20-byte digest
    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        if raw.len() != RAW_OBJECT_ID_LENGTH {
            return Err(KitError::InvalidObjectId(format!(
                "expected {RAW_OBJECT_ID_LENGTH} raw bytes, got {}",
                raw.len()
            )));
        }

        Ok(Self(raw.iter().map(|byte| format!("{byte:02x}")).collect()))
    }

    /// Build an object ID from a fixed-size digest
    pub(crate) fn from_digest(raw: [u8; RAW_OBJECT_ID_LENGTH]) -> Self {
        Self(raw.iter().map(|byte| format!("{byte:02x}")).collect())
    }

    /// Raw 20-byte form of the hash
    pub fn to_raw(&self) -> [u8; RAW_OBJECT_ID_LENGTH] {
        let mut raw = [0u8; RAW_OBJECT_ID_LENGTH];
        for (i, byte) in raw.iter_mut().enumerate() {
            // validated at construction
            *byte = u8::from_str_radix(&self.0[2 * i..2 * i + 2], 16).unwrap_or_default();
        }
        raw
    }

    /// Write the object ID in binary format (20 bytes)
    ///
    /// Used when serializing tree objects and index entries.
    pub fn write_h40_to<W: io::Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_raw())?;
        Ok(())
    }

    /// Read an object ID from binary format (20 bytes)
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut raw = [0u8; RAW_OBJECT_ID_LENGTH];
        reader.read_exact(&mut raw)?;

        Self::from_raw(&raw)
    }

    /// Convert to file system path for object storage
    ///
    /// For example, `abc123...` becomes `ab/c123...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;
    use rstest::rstest;

    #[rstest]
    #[case("e69de29bb2d1d6434b8b29ae775ad8c2e48c5391")]
    #[case("E69DE29BB2D1D6434B8B29AE775AD8C2E48C5391")]
    fn parses_full_hex_ids(#[case] id: &str) {
        let oid = ObjectId::try_parse(id).unwrap();
        pretty_assertions::assert_eq!(oid.as_ref(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
    }

    #[rstest]
    #[case("")]
    #[case("e69de29")]
    #[case("z69de29bb2d1d6434b8b29ae775ad8c2e48c5391")]
    #[case("e69de29bb2d1d6434b8b29ae775ad8c2e48c53911")]
    fn rejects_malformed_ids(#[case] id: &str) {
        assert!(matches!(
            ObjectId::try_parse(id),
            Err(KitError::InvalidObjectId(_))
        ));
    }

    #[test]
    fn splits_into_shard_path() {
        let oid = ObjectId::try_parse("e69de29bb2d1d6434b8b29ae775ad8c2e48c5391").unwrap();
        pretty_assertions::assert_eq!(
            oid.to_path(),
            PathBuf::from("e6").join("9de29bb2d1d6434b8b29ae775ad8c2e48c5391")
        );
        pretty_assertions::assert_eq!(oid.to_short_oid(), "e69de29");
    }

    proptest! {
        #[test]
        fn raw_form_preserves_the_hash(id in "[0-9a-f]{40}") {
            let oid = ObjectId::try_parse(&id).unwrap();
            let mut raw = Vec::new();
            oid.write_h40_to(&mut raw).unwrap();

            assert_eq!(raw.len(), RAW_OBJECT_ID_LENGTH);
            assert_eq!(ObjectId::read_h40_from(&mut raw.as_slice()).unwrap(), oid);
        }
    }
}
