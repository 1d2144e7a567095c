use crate::areas::repository::Repository;
use crate::errors::{KitError, Result};
use std::path::Path;

impl Repository {
    /// Remove `path` (or every staged path below it) from the index
    ///
    /// The working-tree files and the stored objects are left alone.
    pub fn unstage(&mut self, path: &Path) -> Result<()> {
        let name = self.workspace().relative_name(path)?;

        let staged = self.index().entries_under_path(&name);
        if staged.is_empty() {
            return Err(KitError::FileNotFound(path.to_path_buf()));
        }

        for staged_name in staged {
            self.index_mut().remove(&staged_name)?;
        }

        Ok(())
    }
}
