use crate::areas::repository::Repository;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{KitError, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateIndexOption {
    /// `-a`: stage a path under an explicit hash and mode
    Add,
    /// `-d`: drop a path from the index
    Remove,
}

impl TryFrom<&str> for UpdateIndexOption {
    type Error = KitError;

    fn try_from(option: &str) -> Result<Self> {
        match option {
            "-a" | "--add" => Ok(UpdateIndexOption::Add),
            "-d" | "--remove" => Ok(UpdateIndexOption::Remove),
            other => Err(KitError::InvalidUpdateIndexOption(other.to_string())),
        }
    }
}

impl Repository {
    /// Add or remove one index entry
    ///
    /// Adding needs both the object ID and the octal mode (`cacheinfo`); the
    /// object is not required to exist yet. Removing an unstaged path is a
    /// no-op.
    pub fn update_index(
        &mut self,
        path: &Path,
        option: UpdateIndexOption,
        object_id: Option<&str>,
        cacheinfo: Option<&str>,
    ) -> Result<()> {
        let name = self.workspace().relative_name(path)?;

        match option {
            UpdateIndexOption::Remove => {
                self.index_mut().remove(&name)?;
                Ok(())
            }
            UpdateIndexOption::Add => {
                let (Some(object_id), Some(cacheinfo)) = (object_id, cacheinfo) else {
                    return Err(KitError::InvalidUpdateIndexOption(
                        "-a requires <sha1> and <cacheinfo>".to_string(),
                    ));
                };

                let object_id = ObjectId::try_parse(object_id)?;
                let mode = EntryMode::try_from(cacheinfo)?;
                self.index_mut().add(&name, object_id, mode)
            }
        }
    }
}
