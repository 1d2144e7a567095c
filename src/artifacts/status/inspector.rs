use crate::areas::repository::Repository;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::errors::Result;
use derive_new::new;
use std::collections::BTreeMap;

/// Flattened tree of the HEAD commit, keyed by path
pub type HeadTree = BTreeMap<String, (EntryMode, ObjectId)>;

#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl Inspector<'_> {
    /// Compare a staged entry with the file currently on disk
    pub fn check_index_against_workspace(
        &self,
        entry: &IndexEntry,
    ) -> Result<Option<WorkspaceChangeType>> {
        let workspace = self.repository.workspace();
        if !workspace.exists(&entry.name) || workspace.is_dir(&entry.name) {
            return Ok(Some(WorkspaceChangeType::Deleted));
        }

        let stat = EntryMetadata::try_from(workspace.absolute(&entry.name).as_path())?;
        if !entry.stat_match(&stat) || self.is_content_changed(entry)? {
            return Ok(Some(WorkspaceChangeType::Modified));
        }

        Ok(None)
    }

    /// Compare a staged entry with the same path in the HEAD tree
    pub fn check_index_against_head_tree(
        &self,
        entry: &IndexEntry,
        head_tree: &HeadTree,
    ) -> Option<IndexChangeType> {
        match head_tree.get(&entry.name) {
            None => Some(IndexChangeType::Added),
            Some((mode, oid)) if *mode != entry.mode() || *oid != entry.oid => {
                Some(IndexChangeType::Modified)
            }
            Some(_) => None,
        }
    }

    fn is_content_changed(&self, entry: &IndexEntry) -> Result<bool> {
        let content = self.repository.workspace().read_file(&entry.name)?;
        let oid = self.repository.database().hash(ObjectType::Blob, &content);

        Ok(oid != entry.oid)
    }
}
