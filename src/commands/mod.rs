//! Command implementations
//!
//! Commands are `impl Repository` blocks, split the way git splits them:
//!
//! - `plumbing`: Low-level object and index manipulation (hash-object, cat-file,
//!   update-index, write-tree, commit-tree, ls-files)
//! - `porcelain`: User-facing workflows (init, add, commit, status, log, ...)
//!
//! Commands return plain data; rendering is left to the binary.

pub mod plumbing;
pub mod porcelain;
