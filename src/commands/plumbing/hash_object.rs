use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::Result;
use std::path::Path;

impl Repository {
    /// Blob ID of the file at `path`, stored in the object database when `write` is set
    ///
    /// Relative paths are resolved against the repository root. The file does
    /// not need to be inside the working tree.
    pub fn hash_object(&self, path: &Path, write: bool) -> Result<ObjectId> {
        let content = Workspace::read_path(&self.path().join(path))?;

        if write {
            self.database().write(ObjectType::Blob, &content)
        } else {
            Ok(self.database().hash(ObjectType::Blob, &content))
        }
    }
}
