use crate::areas::repository::Repository;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use crate::errors::{KitError, Result};
use std::path::Path;

impl Repository {
    /// Build the tree of directory `path` from the staged entries below it
    ///
    /// Subtrees are built before their parents. Files missing from the index
    /// are skipped, and so are directories left without any entry, which
    /// yields `None` when nothing below `path` is staged. Each file uses the
    /// hash recorded in the index and the mode found on disk. Objects are only
    /// stored when `write` is set.
    pub fn write_tree(&self, path: &Path, write: bool) -> Result<Option<ObjectId>> {
        let name = self.workspace().relative_name(path)?;
        if !self.workspace().is_dir(&name) {
            return Err(KitError::DirectoryNotFound(self.path().join(path)));
        }

        self.build_tree(&name, write)
    }

    fn build_tree(&self, dir: &str, write: bool) -> Result<Option<ObjectId>> {
        let mut entries = Vec::new();

        for child in self.workspace().list_dir(dir)? {
            let base_name = child.rsplit('/').next().unwrap_or(&child).to_string();

            if self.workspace().is_dir(&child) {
                if let Some(subtree) = self.build_tree(&child, write)? {
                    entries.push(TreeEntry::new(EntryMode::Directory, base_name, subtree));
                }
            } else if let Some(staged) = self.index().get(&child) {
                let mode = self.workspace().file_mode(&child)?;
                entries.push(TreeEntry::new(mode, base_name, staged.oid.clone()));
            }
        }

        if entries.is_empty() {
            return Ok(None);
        }

        let tree = Tree::new(entries);
        let tree_oid = if write {
            self.database().store(&tree)?
        } else {
            tree.object_id()?
        };

        Ok(Some(tree_oid))
    }
}
