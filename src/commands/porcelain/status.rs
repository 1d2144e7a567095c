use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::{FileChange, IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::inspector::{HeadTree, Inspector};
use crate::artifacts::status::status_report::StatusReport;
use crate::errors::Result;

// Terminology:
// - untracked files: files in the working tree that are not in the index
// - unstaged changes: index entries whose file was modified or deleted on disk
// - staged changes: index entries that differ from the HEAD commit's tree
impl Repository {
    /// Compare working tree, index and HEAD without modifying any of them
    pub fn status(&self) -> Result<StatusReport> {
        let head = self.refs().read_head()?;
        let head_tree = self.load_head_tree()?;
        let inspector = Inspector::new(self);
        let entries = self.index().entries();

        let untracked = self
            .workspace()
            .list_files("")?
            .into_iter()
            .filter(|name| !self.index().contains(name))
            .collect();

        let mut unstaged = Vec::<FileChange<WorkspaceChangeType>>::new();
        let mut staged = Vec::<FileChange<IndexChangeType>>::new();

        for entry in &entries {
            if let Some(change) = inspector.check_index_against_workspace(entry)? {
                unstaged.push(FileChange::new(&entry.name, change));
            }
            if let Some(change) = inspector.check_index_against_head_tree(entry, &head_tree) {
                staged.push(FileChange::new(&entry.name, change));
            }
        }

        for name in head_tree.keys() {
            if !self.index().contains(name) {
                staged.push(FileChange::new(name, IndexChangeType::Deleted));
            }
        }
        staged.sort();

        Ok(StatusReport {
            head,
            untracked,
            staged,
            unstaged,
        })
    }

    /// Flattened tree of the HEAD commit, empty on an unborn branch
    fn load_head_tree(&self) -> Result<HeadTree> {
        let Some(head_oid) = self.refs().head_commit()? else {
            return Ok(HeadTree::new());
        };

        let mut head_tree = HeadTree::new();
        if let Some(commit) = self.database().parse_object_as_commit(&head_oid)? {
            for (name, mode, oid) in self.database().flatten_tree(commit.tree_oid())? {
                head_tree.insert(name, (mode, oid));
            }
        }

        Ok(head_tree)
    }
}
