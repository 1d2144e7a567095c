//! Annotated tag object
//!
//! ## Format
//!
//! ```text
//! tag <size>\0
//! object <target-sha>
//! type <target-type>
//! tag <name>
//! tagger <name> <email> <timestamp> <timezone>
//!
//! <tag message>
//! ```

use crate::artifacts::objects::commit::Author;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{KitError, Result};
use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct Tag {
    target: ObjectId,
    target_type: ObjectType,
    name: String,
    tagger: Author,
    message: String,
}

impl Tag {
    pub fn target(&self) -> &ObjectId {
        &self.target
    }

    pub fn target_type(&self) -> ObjectType {
        self.target_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tagger(&self) -> &Author {
        &self.tagger
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Packable for Tag {
    fn serialize(&self) -> Result<Bytes> {
        Ok(Bytes::from(format!("{}\n", self.display())))
    }
}

impl Unpackable for Tag {
    fn deserialize(payload: Bytes) -> Result<Self> {
        let invalid = |reason: &str| KitError::corrupt_object("tag", reason.to_string());

        let content = String::from_utf8(payload.to_vec()).map_err(|_| invalid("tag is not UTF-8"))?;
        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| invalid("missing blank line before message"))?;
        let mut lines = headers.lines();

        let mut header = |prefix: &str| {
            lines
                .next()
                .and_then(|line| line.strip_prefix(prefix))
                .map(str::to_string)
                .ok_or_else(|| invalid(&format!("missing '{}' line", prefix.trim())))
        };

        let target = ObjectId::try_parse(header("object ")?)?;
        let target_type = ObjectType::try_from(header("type ")?.as_str())?;
        let name = header("tag ")?;
        let tagger = Author::try_from(header("tagger ")?.as_str())?;

        Ok(Tag {
            target,
            target_type,
            name,
            tagger,
            message: message.trim_end_matches('\n').to_string(),
        })
    }
}

impl Object for Tag {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tag
    }

    fn display(&self) -> String {
        format!(
            "object {}\ntype {}\ntag {}\ntagger {}\n\n{}",
            self.target,
            self.target_type,
            self.name,
            self.tagger.display(),
            self.message.trim_end_matches('\n')
        )
    }
}
