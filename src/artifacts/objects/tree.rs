//! Tree object
//!
//! Trees represent directory snapshots. They contain entries for files
//! (blobs), symlinks and subdirectories (other trees), along with their
//! names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`, no separator between entries
//!
//! Entries are serialized in git's canonical order: byte-wise by name, where a
//! directory name compares as if it ended in `/`. Directory listing order
//! therefore never influences the tree hash.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{KitError, Result};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Cursor, Write};

/// One `(mode, name, hash)` record of a tree
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub mode: EntryMode,
    pub name: String,
    pub oid: ObjectId,
}

impl TreeEntry {
    fn sort_key(&self) -> Vec<u8> {
        let mut key = self.name.as_bytes().to_vec();
        if self.mode.is_tree() {
            key.push(b'/');
        }
        key
    }

    pub fn object_type(&self) -> ObjectType {
        match self.mode {
            EntryMode::Directory => ObjectType::Tree,
            _ => ObjectType::Blob,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree from entries in any order
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by_key(TreeEntry::sort_key);
        Tree { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TreeEntry> {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut content = Vec::new();

        for entry in &self.entries {
            write!(content, "{} {}", entry.mode.as_str(), entry.name)?;
            content.push(0);
            entry.oid.write_h40_to(&mut content)?;
        }

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Tree {
    fn deserialize(payload: Bytes) -> Result<Self> {
        let mut reader = Cursor::new(payload);
        let mut entries = Vec::new();

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break;
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(KitError::InvalidMode("unexpected end of tree entry mode".into()));
            }
            let mode_str = std::str::from_utf8(&mode_bytes)
                .map_err(|_| KitError::InvalidMode("tree entry mode is not ASCII".into()))?;
            let mode = EntryMode::try_from(mode_str)?;

            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(KitError::corrupt_object(
                    "tree",
                    "entry name is not NUL-terminated",
                ));
            }
            let name = String::from_utf8(std::mem::take(&mut name_bytes))
                .map_err(|_| KitError::corrupt_object("tree", "entry name is not UTF-8"))?;

            let oid = ObjectId::read_h40_from(&mut reader)?;

            entries.push(TreeEntry::new(mode, name, oid));
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{:0>6} {} {}\t{}",
                    entry.mode.as_str(),
                    entry.object_type(),
                    entry.oid,
                    entry.name
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}
