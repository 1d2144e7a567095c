//! Stateful on-disk areas of a repository
//!
//! - `database`: Object store for blobs, trees, commits and tags
//! - `index`: Staging area recording the next snapshot
//! - `refs`: HEAD, branches and tags
//! - `config`: `.kit/config` key/value settings
//! - `workspace`: Working directory file system operations
//! - `repository`: Owns one of each and ties them to a root directory

pub mod config;
pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
