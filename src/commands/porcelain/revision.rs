use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::ref_name::RefName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{KitError, Result};

/// Annotated tags pointing at tags are followed at most this many times
const MAX_TAG_DEPTH: usize = 16;

impl Repository {
    /// Commit HEAD resolves to, failing on an unborn branch
    pub fn head_commit(&self) -> Result<ObjectId> {
        self.refs()
            .head_commit()?
            .ok_or_else(|| KitError::UnknownRef(HEAD_REF_NAME.to_string()))
    }

    /// Resolve `HEAD`, a full commit ID, a branch or a tag to a commit
    pub fn resolve_commit(&self, revision: &str) -> Result<ObjectId> {
        if revision == HEAD_REF_NAME {
            return self.head_commit();
        }

        if ObjectId::is_full_hex(revision) {
            let object_id = ObjectId::try_parse(revision)?;
            return self
                .peel_to_commit(&object_id)?
                .ok_or_else(|| KitError::UnknownRef(revision.to_string()));
        }

        if RefName::try_parse(revision).is_err() {
            return Err(KitError::UnknownRef(revision.to_string()));
        }

        if let Some(branch_tip) = self.refs().read_branch(revision)? {
            return Ok(branch_tip);
        }

        if let Some(tag_target) = self.refs().read_tag(revision)? {
            return self
                .peel_to_commit(&tag_target)?
                .ok_or_else(|| KitError::UnknownRef(revision.to_string()));
        }

        Err(KitError::UnknownRef(revision.to_string()))
    }

    /// Follow annotated tags from `object_id` down to a commit
    ///
    /// `None` when the object is missing or ends up being a tree or blob.
    pub fn peel_to_commit(&self, object_id: &ObjectId) -> Result<Option<ObjectId>> {
        let mut current = object_id.clone();

        for _ in 0..MAX_TAG_DEPTH {
            if !self.database().exists(&current) {
                return Ok(None);
            }

            match self.database().read(&current)?.0 {
                ObjectType::Commit => return Ok(Some(current)),
                ObjectType::Tag => match self.database().parse_object_as_tag(&current)? {
                    Some(tag) => current = tag.target().clone(),
                    None => return Ok(None),
                },
                ObjectType::Blob | ObjectType::Tree => return Ok(None),
            }
        }

        Ok(None)
    }

    /// Commits from `start` back to the root, following parent links
    pub fn history(&self, start: &ObjectId) -> Result<Vec<ObjectId>> {
        let mut commits = Vec::new();
        let mut next = Some(start.clone());

        while let Some(commit_oid) = next {
            let commit = self
                .database()
                .parse_object_as_commit(&commit_oid)?
                .ok_or_else(|| KitError::corrupt_object(commit_oid.as_ref(), "not a commit"))?;

            next = commit.parent().cloned();
            commits.push(commit_oid);
        }

        Ok(commits)
    }
}
