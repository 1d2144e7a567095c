//! Staging area
//!
//! Holds the snapshot the next commit is built from. Every mutation rewrites
//! the whole file (header, entries sorted by path, trailing SHA-1) through a
//! temp file that is renamed over the old index.
//!
//! Loading takes a shared advisory lock and verifies the checksum. Writers do
//! not coordinate with each other: two processes mutating the same index
//! concurrently can lose updates, exactly as with any other single-user tool.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{KitError, Result};
use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug)]
pub struct Index {
    /// Path to the index file (`.kit/index`)
    path: Box<Path>,
    /// Working-tree root that entry paths are relative to
    root: Box<Path>,
    entries: BTreeMap<String, IndexEntry>,
}

impl Index {
    pub fn new(path: Box<Path>, root: Box<Path>) -> Self {
        Index {
            path,
            root,
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index from disk
    ///
    /// A missing index file is created empty (header, no entries, checksum).
    pub fn load(&mut self) -> Result<()> {
        self.entries.clear();

        if !self.path.exists() {
            return self.write_updates();
        }

        let index_file = std::fs::File::open(&self.path)?;
        let _lock = file_guard::lock(&index_file, file_guard::Lock::Shared, 0, 1)?;
        let mut reader = Checksum::new(BufReader::new(&index_file));

        let entries_count = Self::parse_header(&mut reader)?;
        for _ in 0..entries_count {
            let entry = IndexEntry::read_from(&mut reader)?;
            self.entries.insert(entry.name.clone(), entry);
        }

        reader.verify()
    }

    fn parse_header<R: std::io::Read>(reader: &mut Checksum<R>) -> Result<u32> {
        let header = IndexHeader::deserialize(reader.read(HEADER_SIZE)?)?;

        if header.marker != SIGNATURE {
            return Err(KitError::CorruptIndex(format!(
                "invalid signature '{}'",
                header.marker
            )));
        }

        if header.version != VERSION {
            return Err(KitError::CorruptIndex(format!(
                "unsupported version {}",
                header.version
            )));
        }

        Ok(header.entries_count)
    }

    /// Stage `name` with the given content hash and mode
    ///
    /// A no-op when the path is already staged with the same hash and mode.
    /// Otherwise the current stat information of the file is captured and the
    /// index is rewritten.
    pub fn add(&mut self, name: &str, oid: ObjectId, mode: EntryMode) -> Result<()> {
        if let Some(existing) = self.entries.get(name)
            && existing.oid == oid
            && existing.mode() == mode
        {
            return Ok(());
        }

        let file_path = self.root.join(name);
        let stat = std::fs::symlink_metadata(&file_path)
            .map_err(|_| KitError::FileNotFound(file_path.clone()))?;
        let entry = IndexEntry::new(
            name.to_string(),
            oid,
            EntryMetadata::from_stat(&stat, mode),
        );

        self.entries.insert(name.to_string(), entry);
        self.write_updates()
    }

    /// Drop the entry for `name`, returning whether one existed
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        if self.entries.remove(name).is_none() {
            return Ok(false);
        }

        self.write_updates()?;
        Ok(true)
    }

    pub fn get(&self, name: &str) -> Option<&IndexEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Snapshot of all entries, sorted by path
    pub fn entries(&self) -> Vec<IndexEntry> {
        self.entries.values().cloned().collect()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Paths of entries at or below the directory `prefix` (`""` for all)
    pub fn entries_under_path(&self, prefix: &str) -> Vec<String> {
        self.entries
            .keys()
            .filter(|name| {
                prefix.is_empty()
                    || name.as_str() == prefix
                    || name
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .cloned()
            .collect()
    }

    fn write_updates(&self) -> Result<()> {
        let index_dir = self
            .path
            .parent()
            .ok_or_else(|| KitError::RepositoryNotFound(self.path.to_path_buf()))?;
        let temp_file = tempfile::NamedTempFile::new_in(index_dir)?;
        let mut writer = Checksum::new(temp_file);

        let header = IndexHeader::new(
            String::from(SIGNATURE),
            VERSION,
            self.entries.len() as u32,
        );
        writer.write(&header.serialize()?)?;

        for entry in self.entries.values() {
            writer.write(&entry.serialize()?)?;
        }

        writer.write_checksum()?;
        writer.into_inner().persist(&self.path)?;

        tracing::debug!(entries = self.entries.len(), "rewrote index");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::index::entry_mode::FileMode;
    use crate::artifacts::index::CHECKSUM_SIZE;
    use crate::artifacts::objects::codec;
    use crate::artifacts::objects::object_type::ObjectType;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn workspace() -> TempDir {
        let dir = TempDir::new().unwrap();
        dir.child(".kit").create_dir_all().unwrap();
        dir
    }

    fn index(dir: &TempDir) -> Index {
        Index::new(
            dir.path().join(".kit/index").into_boxed_path(),
            dir.path().to_path_buf().into_boxed_path(),
        )
    }

    #[rstest]
    fn load_creates_an_empty_index(workspace: TempDir) {
        let mut index = index(&workspace);

        index.load().unwrap();

        let bytes = std::fs::read(workspace.path().join(".kit/index")).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + CHECKSUM_SIZE);
        assert_eq!(&bytes[0..4], b"DIRC");
        assert_eq!(&bytes[4..8], &2u32.to_be_bytes());
        assert_eq!(&bytes[8..12], &0u32.to_be_bytes());
        assert_eq!(index.entry_count(), 0);
    }

    #[rstest]
    fn entries_survive_a_reload(workspace: TempDir) {
        workspace.child("b.txt").write_str("b").unwrap();
        workspace.child("a/c.txt").write_str("c").unwrap();
        let mut index = index(&workspace);
        index.load().unwrap();

        let b = codec::hash(ObjectType::Blob, b"b");
        let c = codec::hash(ObjectType::Blob, b"c");
        index.add("b.txt", b.clone(), EntryMode::default()).unwrap();
        index
            .add("a/c.txt", c.clone(), EntryMode::File(FileMode::Executable))
            .unwrap();

        let mut reloaded = self::index(&workspace);
        reloaded.load().unwrap();

        let names: Vec<_> = reloaded.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["a/c.txt", "b.txt"]);
        assert_eq!(reloaded.get("b.txt").unwrap().oid, b);
        assert_eq!(
            reloaded.get("a/c.txt").unwrap().mode(),
            EntryMode::File(FileMode::Executable)
        );
    }

    #[rstest]
    fn adding_the_same_content_twice_keeps_one_entry(workspace: TempDir) {
        workspace.child("file.txt").write_str("data").unwrap();
        let mut index = index(&workspace);
        index.load().unwrap();
        let oid = codec::hash(ObjectType::Blob, b"data");

        index.add("file.txt", oid.clone(), EntryMode::default()).unwrap();
        let first = index.get("file.txt").cloned().unwrap();
        index.add("file.txt", oid, EntryMode::default()).unwrap();

        assert_eq!(index.entry_count(), 1);
        assert_eq!(index.get("file.txt"), Some(&first));
    }

    #[rstest]
    fn remove_reports_whether_the_path_was_staged(workspace: TempDir) {
        workspace.child("file.txt").write_str("data").unwrap();
        let mut index = index(&workspace);
        index.load().unwrap();
        index
            .add("file.txt", codec::hash(ObjectType::Blob, b"data"), EntryMode::default())
            .unwrap();

        assert!(index.remove("file.txt").unwrap());
        assert!(!index.remove("file.txt").unwrap());
        assert_eq!(index.entry_count(), 0);
    }

    #[rstest]
    fn filters_entries_by_directory(workspace: TempDir) {
        for name in ["dir/a", "dir/sub/b", "dirt", "other"] {
            workspace.child(name).write_str(name).unwrap();
        }
        let mut index = index(&workspace);
        index.load().unwrap();
        for name in ["dir/a", "dir/sub/b", "dirt", "other"] {
            index
                .add(name, codec::hash(ObjectType::Blob, name.as_bytes()), EntryMode::default())
                .unwrap();
        }

        assert_eq!(index.entries_under_path("dir"), vec!["dir/a", "dir/sub/b"]);
        assert_eq!(index.entries_under_path("").len(), 4);
    }

    #[rstest]
    fn rejects_a_tampered_file(workspace: TempDir) {
        workspace.child("file.txt").write_str("data").unwrap();
        let mut index = index(&workspace);
        index.load().unwrap();
        index
            .add("file.txt", codec::hash(ObjectType::Blob, b"data"), EntryMode::default())
            .unwrap();

        let index_path = workspace.path().join(".kit/index");
        let mut bytes = std::fs::read(&index_path).unwrap();
        bytes[HEADER_SIZE + 62] = b'F';
        std::fs::write(&index_path, bytes).unwrap();

        let mut reloaded = self::index(&workspace);
        assert!(matches!(reloaded.load(), Err(KitError::CorruptIndex(_))));
    }
}
