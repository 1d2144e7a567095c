//! Index entry representation
//!
//! Each entry in the index represents a staged file with:
//! - File path relative to the repository root, `/`-separated
//! - Content hash (object ID)
//! - File metadata (mode, size, timestamps)
//!
//! ## Entry Format
//!
//! ```text
//! ctime(4) ctime_nsec(4) mtime(4) mtime_nsec(4) dev(4) ino(4)
//! mode(4) uid(4) gid(4) size(4) oid(20) flags(2) path(n) NUL(1..=8)
//! ```
//!
//! All integers are big-endian. The low 12 bits of `flags` carry the path
//! length (saturated at `0xFFF`). NUL padding always follows the path and
//! rounds the record up to the next multiple of 8 bytes, so an already
//! aligned record still gets a full block of padding.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{KitError, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::cmp::min;
use std::fs::Metadata;
use std::io::{Read, Write};
use std::os::unix::prelude::MetadataExt;
use std::path::Path;

/// Largest path length representable in the flags field
pub const MAX_PATH_SIZE: usize = 0xFFF;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Size of the fixed-width part of an entry, up to and including the flags
pub const ENTRY_FIXED_SIZE: usize = 62;

/// Number of NUL bytes following a path of `name_len` bytes
pub fn padding_len(name_len: usize) -> usize {
    ENTRY_BLOCK - (ENTRY_FIXED_SIZE + name_len) % ENTRY_BLOCK
}

/// Index entry representing a staged file
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// File path relative to repository root
    pub name: String,
    /// SHA-1 hash of the staged content
    pub oid: ObjectId,
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    pub fn path(&self) -> &Path {
        Path::new(&self.name)
    }

    pub fn mode(&self) -> EntryMode {
        self.metadata.mode
    }

    pub fn flags(&self) -> u16 {
        min(self.name.len(), MAX_PATH_SIZE) as u16
    }

    /// Whether mode and size still agree with a fresh stat of the file
    ///
    /// A match does not prove the content is unchanged, only a mismatch
    /// proves it changed.
    pub fn stat_match(&self, stat: &EntryMetadata) -> bool {
        self.metadata.mode == stat.mode && self.metadata.size == stat.size
    }

    /// Read one entry from a checksummed index stream
    pub(crate) fn read_from<R: Read>(reader: &mut Checksum<R>) -> Result<Self> {
        let fixed = reader.read(ENTRY_FIXED_SIZE)?;

        let ctime = byteorder::NetworkEndian::read_u32(&fixed[0..4]);
        let ctime_nsec = byteorder::NetworkEndian::read_u32(&fixed[4..8]);
        let mtime = byteorder::NetworkEndian::read_u32(&fixed[8..12]);
        let mtime_nsec = byteorder::NetworkEndian::read_u32(&fixed[12..16]);
        let dev = byteorder::NetworkEndian::read_u32(&fixed[16..20]);
        let ino = byteorder::NetworkEndian::read_u32(&fixed[20..24]);
        let mode = EntryMode::try_from(byteorder::NetworkEndian::read_u32(&fixed[24..28]))?;
        let uid = byteorder::NetworkEndian::read_u32(&fixed[28..32]);
        let gid = byteorder::NetworkEndian::read_u32(&fixed[32..36]);
        let size = byteorder::NetworkEndian::read_u32(&fixed[36..40]);
        let oid = ObjectId::from_raw(&fixed[40..60])?;
        let flags = byteorder::NetworkEndian::read_u16(&fixed[60..62]);

        let name_len = flags as usize & MAX_PATH_SIZE;
        let name_bytes = if name_len < MAX_PATH_SIZE {
            let name = reader.read(name_len)?;
            reader.read(padding_len(name_len))?;
            name.to_vec()
        } else {
            // saturated length, the path runs until the first NUL
            let mut name = reader.read(name_len)?.to_vec();
            loop {
                let block = reader.read(1)?;
                if block[0] == 0 {
                    break;
                }
                name.push(block[0]);
            }
            reader.read(padding_len(name.len()) - 1)?;
            name
        };

        let name = String::from_utf8(name_bytes)
            .map_err(|_| KitError::CorruptIndex("entry path is not UTF-8".into()))?;

        Ok(IndexEntry {
            name,
            oid,
            metadata: EntryMetadata {
                ctime,
                ctime_nsec,
                mtime,
                mtime_nsec,
                dev,
                ino,
                mode,
                uid,
                gid,
                size,
            },
        })
    }
}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

/// File metadata stored in index entries
///
/// Values are truncated to 32 bits, as in the on-disk record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: u32,
    pub ctime_nsec: u32,
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode: EntryMode,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

impl EntryMetadata {
    /// Stat information for `metadata`, recorded under the staged `mode`
    pub fn from_stat(metadata: &Metadata, mode: EntryMode) -> Self {
        EntryMetadata {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode,
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
        }
    }
}

impl TryFrom<&Path> for EntryMetadata {
    type Error = KitError;

    /// Stat a file on disk, deriving its mode from the symlink and executable bits
    fn try_from(file_path: &Path) -> Result<Self> {
        let metadata = std::fs::symlink_metadata(file_path)
            .map_err(|_| KitError::FileNotFound(file_path.to_path_buf()))?;

        let mode = if metadata.file_type().is_symlink() {
            EntryMode::Symlink
        } else if metadata.mode() & 0o111 != 0 {
            EntryMode::File(FileMode::Executable)
        } else {
            EntryMode::File(FileMode::Regular)
        };

        Ok(EntryMetadata::from_stat(&metadata, mode))
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> Result<Bytes> {
        let padding = padding_len(self.name.len());
        let mut entry_bytes = Vec::with_capacity(ENTRY_FIXED_SIZE + self.name.len() + padding);

        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ctime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ctime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mtime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mtime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.dev)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ino)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mode.as_u32())?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.uid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.gid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.size)?;
        self.oid.write_h40_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(self.flags())?;
        entry_bytes.write_all(self.name.as_bytes())?;
        entry_bytes.resize(entry_bytes.len() + padding, 0);

        Ok(Bytes::from(entry_bytes))
    }
}
