//! Content-addressed object store
//!
//! Objects live zlib-compressed under `objects/<xx>/<38 hex>`, keyed by the
//! SHA-1 of their framed bytes. Writes go through a temp file in the shard
//! directory and are renamed into place, so readers never observe a
//! half-written object.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::codec;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{KitError, Result};
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Object ID of `payload` framed as `object_type`, without touching disk
    pub fn hash(&self, object_type: ObjectType, payload: &[u8]) -> ObjectId {
        codec::hash(object_type, payload)
    }

    /// Persist `payload` as an object of `object_type` and return its ID
    pub fn write(&self, object_type: ObjectType, payload: &[u8]) -> Result<ObjectId> {
        if !self.path.is_dir() {
            return Err(KitError::RepositoryNotFound(self.path.to_path_buf()));
        }

        let framed = codec::frame(object_type, payload);
        let object_id = codec::digest(&framed);
        let object_path = self.path.join(object_id.to_path());

        // content-addressed, so an existing file already holds these bytes
        if object_path.exists() {
            return Ok(object_id);
        }

        let object_dir = object_path
            .parent()
            .ok_or_else(|| KitError::RepositoryNotFound(self.path.to_path_buf()))?;
        std::fs::create_dir_all(object_dir)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(object_dir)?;
        temp_file.write_all(&codec::compress(&framed)?)?;
        temp_file.persist(&object_path)?;

        tracing::debug!(oid = %object_id, kind = %object_type, size = payload.len(), "stored object");

        Ok(object_id)
    }

    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        self.write(object.object_type(), &object.serialize()?)
    }

    /// Inflate an object and split it into its type and payload
    pub fn read(&self, object_id: &ObjectId) -> Result<(ObjectType, Bytes)> {
        let object_path = self.path.join(object_id.to_path());

        let compressed = std::fs::read(&object_path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => KitError::ObjectNotFound(object_id.to_string()),
            _ => err.into(),
        })?;
        let framed = codec::decompress(&compressed)?;

        codec::split_header(object_id, &framed)
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> Result<ObjectBox> {
        let (object_type, payload) = self.read(object_id)?;

        ObjectBox::parse(object_type, payload)
    }

    /// Parse `object_id` as a commit, `None` if it is another kind of object
    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> Result<Option<Commit>> {
        match self.read(object_id)? {
            (ObjectType::Commit, payload) => Ok(Some(Commit::deserialize(payload)?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> Result<Option<Blob>> {
        match self.read(object_id)? {
            (ObjectType::Blob, payload) => Ok(Some(Blob::deserialize(payload)?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> Result<Option<Tree>> {
        match self.read(object_id)? {
            (ObjectType::Tree, payload) => Ok(Some(Tree::deserialize(payload)?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tag(&self, object_id: &ObjectId) -> Result<Option<Tag>> {
        match self.read(object_id)? {
            (ObjectType::Tag, payload) => Ok(Some(Tag::deserialize(payload)?)),
            _ => Ok(None),
        }
    }

    /// Whether `object_id` names an existing object of the given kind
    pub fn is_object_of_type(&self, object_id: &ObjectId, object_type: ObjectType) -> bool {
        self.exists(object_id)
            && matches!(self.read(object_id), Ok((found, _)) if found == object_type)
    }

    /// Recursively list every non-tree entry below `tree_oid`
    ///
    /// Paths are `/`-joined and relative to the tree's root; the result is in
    /// tree order, depth first.
    pub fn flatten_tree(&self, tree_oid: &ObjectId) -> Result<Vec<(String, EntryMode, ObjectId)>> {
        let mut flattened = Vec::new();
        self.flatten_tree_into(tree_oid, &PathBuf::new(), &mut flattened)?;

        Ok(flattened)
    }

    fn flatten_tree_into(
        &self,
        tree_oid: &ObjectId,
        prefix: &Path,
        flattened: &mut Vec<(String, EntryMode, ObjectId)>,
    ) -> Result<()> {
        let tree = self
            .parse_object_as_tree(tree_oid)?
            .ok_or_else(|| KitError::TreeNotFound(tree_oid.to_string()))?;

        for entry in tree.into_entries() {
            let entry_path = prefix.join(&entry.name);

            if entry.mode.is_tree() {
                self.flatten_tree_into(&entry.oid, &entry_path, flattened)?;
            } else {
                flattened.push((
                    entry_path.to_string_lossy().into_owned(),
                    entry.mode,
                    entry.oid,
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::tree::TreeEntry;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use proptest::prelude::{any, prop, proptest};
    use rstest::{fixture, rstest};

    #[fixture]
    fn objects_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("objects")).unwrap();
        dir
    }

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().join("objects").into_boxed_path())
    }

    #[rstest]
    fn writes_under_the_shard_path(objects_dir: TempDir) {
        let database = database(&objects_dir);

        let oid = database.write(ObjectType::Blob, b"test content\n").unwrap();

        assert_eq!(oid.as_ref(), "d670460b4b4aece5915caf5c68d12f560a9fe3e4");
        assert!(
            objects_dir
                .path()
                .join("objects/d6/70460b4b4aece5915caf5c68d12f560a9fe3e4")
                .is_file()
        );
        assert!(database.exists(&oid));
    }

    #[rstest]
    fn reads_back_type_and_payload(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = database.store(&Blob::new(Bytes::from_static(b"hello"))).unwrap();

        let (object_type, payload) = database.read(&oid).unwrap();

        assert_eq!(object_type, ObjectType::Blob);
        assert_eq!(payload, Bytes::from_static(b"hello"));
    }

    proptest! {
        #[test]
        fn reads_back_any_type_and_payload(
            object_type in prop::sample::select(vec![
                ObjectType::Blob,
                ObjectType::Tree,
                ObjectType::Commit,
                ObjectType::Tag,
            ]),
            payload in prop::collection::vec(any::<u8>(), 0..4096),
        ) {
            let dir = objects_dir();
            let database = database(&dir);

            let oid = database.write(object_type, &payload).unwrap();

            assert_eq!(oid, database.hash(object_type, &payload));
            assert_eq!(database.read(&oid).unwrap(), (object_type, Bytes::from(payload)));
        }
    }

    #[rstest]
    fn writing_twice_is_harmless(objects_dir: TempDir) {
        let database = database(&objects_dir);

        let first = database.write(ObjectType::Blob, b"same").unwrap();
        let second = database.write(ObjectType::Blob, b"same").unwrap();

        assert_eq!(first, second);
        assert_eq!(database.hash(ObjectType::Blob, b"same"), first);
    }

    #[test]
    fn write_requires_the_objects_root() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join("missing").into_boxed_path());

        assert!(matches!(
            database.write(ObjectType::Blob, b"data"),
            Err(KitError::RepositoryNotFound(_))
        ));
    }

    #[rstest]
    fn missing_object_is_reported(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = database.hash(ObjectType::Blob, b"never written");

        assert!(!database.exists(&oid));
        assert!(matches!(database.read(&oid), Err(KitError::ObjectNotFound(_))));
    }

    #[rstest]
    fn flattens_nested_trees(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let blob = database.write(ObjectType::Blob, b"x").unwrap();
        let inner = database
            .store(&Tree::new(vec![TreeEntry::new(
                EntryMode::default(),
                "c.txt".into(),
                blob.clone(),
            )]))
            .unwrap();
        let outer = database
            .store(&Tree::new(vec![
                TreeEntry::new(EntryMode::default(), "a.txt".into(), blob.clone()),
                TreeEntry::new(EntryMode::Directory, "b".into(), inner),
            ]))
            .unwrap();

        let flattened = database.flatten_tree(&outer).unwrap();

        assert_eq!(
            flattened,
            vec![
                ("a.txt".to_string(), EntryMode::default(), blob.clone()),
                ("b/c.txt".to_string(), EntryMode::default(), blob),
            ]
        );
    }
}
