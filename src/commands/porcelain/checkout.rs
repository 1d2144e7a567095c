use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::ref_name::RefName;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{KitError, Result};

impl Repository {
    /// Switch HEAD to `target` and make the working tree match its snapshot
    ///
    /// A full commit ID or a tag detaches HEAD, a branch name attaches it.
    /// Every currently staged file is removed from disk and index before
    /// the target commit's files are written back and restaged. Nothing is
    /// touched when a tracked path has been replaced by a directory.
    pub fn checkout(&mut self, target: &str) -> Result<Head> {
        let (head, commit_oid) = self.resolve_checkout_target(target)?;

        let commit = self
            .database()
            .parse_object_as_commit(&commit_oid)?
            .ok_or_else(|| KitError::UnknownRef(target.to_string()))?;
        let files = self.database().flatten_tree(commit.tree_oid())?;
        self.check_tracked_files_removable()?;

        match &head {
            Head::Symbolic(branch) => self.refs().set_head_symbolic(&RefName::try_parse(branch)?)?,
            Head::Detached(oid) => self.refs().set_head_detached(oid)?,
        }

        self.clear_tracked_files()?;

        for (name, mode, blob_oid) in files {
            self.restore_file(&name, mode, &blob_oid)?;
        }

        tracing::info!(revision = target, commit = %commit_oid, "checked out");

        Ok(head)
    }

    fn resolve_checkout_target(&self, target: &str) -> Result<(Head, ObjectId)> {
        if ObjectId::is_full_hex(target) {
            let oid = ObjectId::try_parse(target)?;
            if !self.database().is_object_of_type(&oid, ObjectType::Commit) {
                return Err(KitError::UnknownRef(target.to_string()));
            }
            return Ok((Head::Detached(oid.clone()), oid));
        }

        if RefName::try_parse(target).is_err() {
            return Err(KitError::UnknownRef(target.to_string()));
        }

        if let Some(tip) = self.refs().read_branch(target)? {
            return Ok((Head::Symbolic(target.to_string()), tip));
        }

        if let Some(tag_target) = self.refs().read_tag(target)? {
            let oid = self
                .peel_to_commit(&tag_target)?
                .ok_or_else(|| KitError::UnknownRef(target.to_string()))?;
            return Ok((Head::Detached(oid.clone()), oid));
        }

        Err(KitError::UnknownRef(target.to_string()))
    }

    /// Tracked paths that turned into real directories cannot be cleared
    fn check_tracked_files_removable(&self) -> Result<()> {
        let stale = self
            .index()
            .entries_under_path("")
            .into_iter()
            .filter(|name| self.workspace().is_dir(name))
            .collect::<Vec<_>>();

        if stale.is_empty() {
            Ok(())
        } else {
            Err(KitError::StaleDirectories(stale))
        }
    }

    fn clear_tracked_files(&mut self) -> Result<()> {
        for name in self.index().entries_under_path("") {
            if self.workspace().exists(&name) {
                self.workspace().remove_file(&name)?;
            }
            self.index_mut().remove(&name)?;
        }

        Ok(())
    }

    fn restore_file(&mut self, name: &str, mode: EntryMode, blob_oid: &ObjectId) -> Result<()> {
        let blob = self
            .database()
            .parse_object_as_blob(blob_oid)?
            .ok_or_else(|| KitError::corrupt_object(blob_oid.as_ref(), "tree entry is not a blob"))?;

        self.workspace().write_file(name, blob.content(), mode)?;
        tracing::debug!(name, %blob_oid, "restored");

        self.add_file(name)
    }
}
