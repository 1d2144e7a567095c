use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{KitError, Result};

/// What `cat-file` reports about an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileOption {
    /// `-t`: object type
    Type,
    /// `-s`: payload size in bytes
    Size,
    /// `-p`: human-readable payload
    Pretty,
}

impl TryFrom<&str> for CatFileOption {
    type Error = KitError;

    fn try_from(option: &str) -> Result<Self> {
        match option {
            "-t" => Ok(CatFileOption::Type),
            "-s" => Ok(CatFileOption::Size),
            "-p" => Ok(CatFileOption::Pretty),
            other => Err(KitError::InvalidCatFileOption(other.to_string())),
        }
    }
}

impl Repository {
    pub fn cat_file(&self, object: &str, option: CatFileOption) -> Result<String> {
        let object_id = ObjectId::try_parse(object)?;
        let (object_type, payload) = self.database().read(&object_id)?;

        Ok(match option {
            CatFileOption::Type => object_type.to_string(),
            CatFileOption::Size => payload.len().to_string(),
            CatFileOption::Pretty => ObjectBox::parse(object_type, payload)?.display(),
        })
    }
}
