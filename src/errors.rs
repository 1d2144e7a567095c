//! Error types for the kit library.
//!
//! Every operation of the object store, index, tree builder and commit graph
//! reports failures through [`KitError`]. User-correctable failures (bad
//! paths, duplicate names, nothing to commit) and invariant violations
//! (missing objects, corrupt files) get their own variants; raw I/O faults
//! travel through [`KitError::Io`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using kit's error type.
pub type Result<T> = std::result::Result<T, KitError>;

#[derive(Error, Debug)]
pub enum KitError {
    #[error("pathspec '{0}' did not match any files")]
    FileNotFound(PathBuf),

    #[error("pathspec '{0}' is outside repository")]
    PathOutsideRepository(PathBuf),

    #[error("the object database does not exist at {0}")]
    RepositoryNotFound(PathBuf),

    #[error("not a kit repository (or any of the parent directories): {0}")]
    NotARepository(PathBuf),

    #[error("{0} (No such file or directory)")]
    DirectoryNotFound(PathBuf),

    #[error("object {0} not found")]
    ObjectNotFound(String),

    #[error("tree {0} does not exist")]
    TreeNotFound(String),

    #[error("parent commit {0} does not exist")]
    ParentNotFound(String),

    #[error("commit message is empty")]
    EmptyCommitMessage,

    #[error("nothing to commit, working tree clean")]
    NothingToCommit,

    #[error("pathspec '{0}' did not match any ref known to kit")]
    UnknownRef(String),

    #[error("not a valid branch name: '{0}'")]
    UnknownBranch(String),

    #[error(
        "updating the following directories would lose untracked files in them:\n\t{}\nPlease move or remove them before you switch branches.",
        .0.join("\n\t")
    )]
    StaleDirectories(Vec<String>),

    #[error("a branch named '{0}' already exists")]
    BranchExists(String),

    #[error("tag '{0}' already exists")]
    TagExists(String),

    #[error("'{0}' is not a valid branch or tag name")]
    InvalidRefName(String),

    #[error("invalid cat-file option '{0}', usage: cat-file [-t | -s | -p] <object>")]
    InvalidCatFileOption(String),

    #[error("invalid update-index option '{0}', usage: update-index <path> (-a|-d) <sha1> <cacheinfo>")]
    InvalidUpdateIndexOption(String),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("invalid object type: {0}")]
    InvalidObjectType(String),

    #[error("invalid entry mode: {0}")]
    InvalidMode(String),

    #[error("corrupt object {oid}: {reason}")]
    CorruptObject { oid: String, reason: String },

    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    #[error("invalid config key '{0}', expected <section>.<key>")]
    InvalidConfigKey(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl KitError {
    pub fn corrupt_object(oid: impl Into<String>, reason: impl Into<String>) -> Self {
        KitError::CorruptObject {
            oid: oid.into(),
            reason: reason.into(),
        }
    }
}

impl From<tempfile::PersistError> for KitError {
    fn from(err: tempfile::PersistError) -> Self {
        KitError::Io { source: err.error }
    }
}

impl From<walkdir::Error> for KitError {
    fn from(err: walkdir::Error) -> Self {
        KitError::Io {
            source: std::io::Error::other(err.to_string()),
        }
    }
}
