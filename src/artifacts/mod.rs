//! Data structures and codecs
//!
//! - `branch`: Ref name validation
//! - `index`: Index/staging area data structures
//! - `objects`: Object types (blob, tree, commit, tag)
//! - `status`: Working tree status inspection

pub mod branch;
pub mod index;
pub mod objects;
pub mod status;
