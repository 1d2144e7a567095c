use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{KitError, Result};

impl Repository {
    /// Record the staged snapshot and advance HEAD
    ///
    /// Moves the current branch when HEAD is symbolic and HEAD itself when it
    /// is detached. Fails with `NothingToCommit` when nothing is staged or the
    /// snapshot equals the parent's tree.
    pub fn commit(&mut self, message: &str) -> Result<ObjectId> {
        if message.trim().is_empty() {
            return Err(KitError::EmptyCommitMessage);
        }

        let root = self.path().to_path_buf();
        let parent = self.refs().head_commit()?;

        let snapshot = self
            .write_tree(&root, false)?
            .ok_or(KitError::NothingToCommit)?;

        if let Some(parent) = &parent {
            let parent_commit = self
                .database()
                .parse_object_as_commit(parent)?
                .ok_or_else(|| KitError::ParentNotFound(parent.to_string()))?;

            if parent_commit.tree_oid() == &snapshot {
                return Err(KitError::NothingToCommit);
            }
        }

        let tree_oid = self
            .write_tree(&root, true)?
            .ok_or(KitError::NothingToCommit)?;
        let commit_oid =
            self.commit_tree(tree_oid.as_ref(), message, parent.as_ref().map(ObjectId::as_ref))?;

        self.refs().update_head(&commit_oid)?;
        tracing::info!(oid = %commit_oid, "committed");

        Ok(commit_oid)
    }
}
