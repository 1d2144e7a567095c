use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{KitError, Result};

impl Repository {
    /// Create a commit object for `tree` and return its ID
    ///
    /// The author and committer come from `user.name`/`user.email`, stamped
    /// with the current time at `+0000`.
    pub fn commit_tree(&self, tree: &str, message: &str, parent: Option<&str>) -> Result<ObjectId> {
        let tree_oid = ObjectId::try_parse(tree)
            .ok()
            .filter(|oid| self.database().is_object_of_type(oid, ObjectType::Tree))
            .ok_or_else(|| KitError::TreeNotFound(tree.to_string()))?;

        let parent_oid = match parent.filter(|parent| !parent.is_empty()) {
            Some(parent) => Some(
                ObjectId::try_parse(parent)
                    .ok()
                    .filter(|oid| self.database().is_object_of_type(oid, ObjectType::Commit))
                    .ok_or_else(|| KitError::ParentNotFound(parent.to_string()))?,
            ),
            None => None,
        };

        if message.trim().is_empty() {
            return Err(KitError::EmptyCommitMessage);
        }

        let author = Author::new(self.config().user_name()?, self.config().user_email()?);
        let commit = Commit::new(parent_oid, tree_oid, author, message.to_string());
        let commit_oid = self.database().store(&commit)?;

        tracing::debug!(oid = %commit_oid, tree = %commit.tree_oid(), "created commit object");

        Ok(commit_oid)
    }
}
