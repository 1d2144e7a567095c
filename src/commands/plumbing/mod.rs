//! Plumbing commands (low-level operations)
//!
//! ## Commands
//!
//! - `hash-object`: Compute a blob ID and optionally store it
//! - `cat-file`: Print the type, size or content of an object
//! - `update-index`: Add or remove a single index entry
//! - `write-tree`: Build tree objects from the staged entries
//! - `commit-tree`: Create a commit object for a tree
//! - `ls-files`: List staged paths

pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod ls_files;
pub mod update_index;
pub mod write_tree;
