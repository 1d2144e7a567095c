use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{KitError, Result};
use std::path::Path;

impl Repository {
    /// Stage a file, or every file below a directory
    ///
    /// Index entries under `path` whose files no longer exist are dropped, so
    /// adding a directory also records deletions inside it. Paths inside the
    /// metadata directory are silently ignored.
    pub fn add(&mut self, path: &Path) -> Result<()> {
        let name = self.workspace().relative_name(path)?;
        if Workspace::is_metadata_path(&name) {
            return Ok(());
        }

        let vanished = self
            .index()
            .entries_under_path(&name)
            .into_iter()
            .filter(|staged| !self.workspace().exists(staged))
            .collect::<Vec<_>>();

        if !self.workspace().exists(&name) && vanished.is_empty() {
            return Err(KitError::FileNotFound(path.to_path_buf()));
        }

        if self.workspace().exists(&name) {
            for file in self.workspace().list_files(&name)? {
                self.add_file(&file)?;
            }
        }

        for staged in vanished {
            tracing::debug!(path = %staged, "dropping vanished file from index");
            self.index_mut().remove(&staged)?;
        }

        Ok(())
    }

    /// Hash and store one working-tree file, then stage it under its disk mode
    pub(crate) fn add_file(&mut self, name: &str) -> Result<()> {
        let content = self.workspace().read_file(name)?;
        let mode = self.workspace().file_mode(name)?;
        let blob_oid = self.database().write(ObjectType::Blob, &content)?;

        self.index_mut().add(name, blob_oid, mode)
    }
}
