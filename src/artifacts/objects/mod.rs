//! Object types and operations
//!
//! Every piece of content is stored as an object identified by the SHA-1 of
//! its framed bytes. The store supports four kinds:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: Directory listing (names, modes, and object IDs)
//! - **Commit**: Snapshot with metadata (tree, optional parent, author, message)
//! - **Tag**: Annotated reference to another object
//!
//! All objects share the loose-object framing `<type> <size>\0<content>`.

pub mod blob;
pub mod codec;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tag;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in raw bytes
pub const RAW_OBJECT_ID_LENGTH: usize = 20;
