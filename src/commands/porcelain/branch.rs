use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::ref_name::RefName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{KitError, Result};

impl Repository {
    /// Create branch `name` at `start` (HEAD by default) without moving HEAD
    pub fn branch(&self, name: &str, start: Option<&str>) -> Result<ObjectId> {
        let name = RefName::try_parse(name)?;
        if self.refs().branch_exists(name.as_ref()) {
            return Err(KitError::BranchExists(name.to_string()));
        }

        let target = self.resolve_commit(start.unwrap_or(HEAD_REF_NAME))?;
        self.refs().create_branch(&name, &target)?;

        tracing::info!(branch = %name, oid = %target, "created branch");

        Ok(target)
    }

    /// Existing branches and their tips, sorted by name
    pub fn branches(&self) -> Result<Vec<(String, ObjectId)>> {
        self.refs().list_branches()
    }
}
