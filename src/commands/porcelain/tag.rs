use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::ref_name::RefName;
use crate::artifacts::objects::commit::Author;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tag::Tag;
use crate::errors::{KitError, Result};

impl Repository {
    /// Create an annotated tag for `target` (HEAD's commit by default)
    ///
    /// A full object ID may name any kind of object; other revisions must
    /// resolve to a commit. Returns the ID of the tag object.
    pub fn tag(&self, name: &str, message: &str, target: Option<&str>) -> Result<ObjectId> {
        let name = RefName::try_parse(name)?;
        if self.refs().read_tag(name.as_ref())?.is_some() {
            return Err(KitError::TagExists(name.to_string()));
        }

        let target = match target {
            Some(object) if ObjectId::is_full_hex(object) => {
                let object_id = ObjectId::try_parse(object)?;
                if !self.database().exists(&object_id) {
                    return Err(KitError::UnknownRef(object.to_string()));
                }
                object_id
            }
            Some(revision) => self.resolve_commit(revision)?,
            None => self.resolve_commit(HEAD_REF_NAME)?,
        };
        let (target_type, _) = self.database().read(&target)?;

        let tagger = Author::new(self.config().user_name()?, self.config().user_email()?);
        let tag = Tag::new(
            target.clone(),
            target_type,
            name.to_string(),
            tagger,
            message.to_string(),
        );
        let tag_oid = self.database().store(&tag)?;
        self.refs().create_tag(&name, &tag_oid)?;

        tracing::info!(tag = %name, object = %target, "created tag");

        Ok(tag_oid)
    }

    /// Existing tags and the object each ref file holds, sorted by name
    pub fn tags(&self) -> Result<Vec<(String, ObjectId)>> {
        self.refs().list_tags()
    }
}
