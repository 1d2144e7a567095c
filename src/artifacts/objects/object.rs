use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::codec;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use crate::errors::Result;
use bytes::Bytes;

/// Serialize an object's payload (without the loose-object header)
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Parse an object from its payload (the header has already been stripped)
pub trait Unpackable {
    fn deserialize(payload: Bytes) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Human-readable form, as printed by `cat-file -p`
    fn display(&self) -> String;

    fn object_id(&self) -> Result<ObjectId> {
        Ok(codec::hash(self.object_type(), &self.serialize()?))
    }
}

pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
    Tag(Box<Tag>),
}

impl ObjectBox {
    pub fn parse(object_type: ObjectType, payload: Bytes) -> Result<Self> {
        Ok(match object_type {
            ObjectType::Blob => ObjectBox::Blob(Box::new(Blob::deserialize(payload)?)),
            ObjectType::Tree => ObjectBox::Tree(Box::new(Tree::deserialize(payload)?)),
            ObjectType::Commit => ObjectBox::Commit(Box::new(Commit::deserialize(payload)?)),
            ObjectType::Tag => ObjectBox::Tag(Box::new(Tag::deserialize(payload)?)),
        })
    }

    pub fn display(&self) -> String {
        match self {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
            ObjectBox::Tag(tag) => tag.display(),
        }
    }
}
