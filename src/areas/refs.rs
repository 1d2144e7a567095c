//! References (HEAD, branches, tags)
//!
//! ## File Format
//!
//! - `HEAD` holds either `ref: refs/heads/<branch>` or a bare 40-hex commit ID
//! - `refs/heads/<name>` holds the tip commit of a branch
//! - `refs/tags/<name>` holds a tag object ID, or a commit ID for a lightweight tag
//!
//! Names may contain `/`, which nests the ref file in subdirectories. Every
//! ref file is replaced atomically through a temp file in its directory.

use crate::artifacts::branch::ref_name::RefName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{KitError, Result};
use derive_new::new;
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Branch created by `init`
pub const DEFAULT_BRANCH: &str = "master";

/// What HEAD currently designates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// On a branch, which may not have any commits yet
    Symbolic(String),
    /// Directly on a commit
    Detached(ObjectId),
}

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (`.kit`)
    path: Box<Path>,
}

impl Refs {
    pub fn read_head(&self) -> Result<Head> {
        let content = std::fs::read_to_string(self.head_path())
            .map_err(|_| KitError::NotARepository(self.path.to_path_buf()))?;
        let content = content.trim();

        let symref_match = regex::Regex::new(SYMREF_REGEX)
            .map_err(|_| KitError::UnknownRef(content.to_string()))?
            .captures(content);

        match symref_match {
            Some(symref_match) => Ok(Head::Symbolic(symref_match[1].to_string())),
            None => Ok(Head::Detached(ObjectId::try_parse(content)?)),
        }
    }

    /// Commit HEAD resolves to, `None` on a branch that has no commits yet
    pub fn head_commit(&self) -> Result<Option<ObjectId>> {
        match self.read_head()? {
            Head::Symbolic(branch) => self.read_branch(&branch),
            Head::Detached(oid) => Ok(Some(oid)),
        }
    }

    pub fn set_head_symbolic(&self, branch: &RefName) -> Result<()> {
        tracing::debug!(%branch, "HEAD now follows branch");
        self.write_ref_file(&self.head_path(), &format!("ref: refs/heads/{branch}"))
    }

    pub fn set_head_detached(&self, oid: &ObjectId) -> Result<()> {
        tracing::debug!(%oid, "HEAD detached");
        self.write_ref_file(&self.head_path(), oid.as_ref())
    }

    /// Advance whatever HEAD designates to `oid`
    ///
    /// Moves the current branch when HEAD is symbolic, HEAD itself otherwise.
    pub fn update_head(&self, oid: &ObjectId) -> Result<()> {
        match self.read_head()? {
            Head::Symbolic(branch) => self.update_branch(&RefName::try_parse(branch)?, oid),
            Head::Detached(_) => self.set_head_detached(oid),
        }
    }

    pub fn read_branch(&self, name: &str) -> Result<Option<ObjectId>> {
        Self::read_ref_file(&self.heads_path().join(name))
    }

    /// Tip commit of `name`, failing when the branch does not exist
    pub fn branch_commit(&self, name: &str) -> Result<ObjectId> {
        self.read_branch(name)?
            .ok_or_else(|| KitError::UnknownBranch(name.to_string()))
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.heads_path().join(name).is_file()
    }

    pub fn create_branch(&self, name: &RefName, oid: &ObjectId) -> Result<()> {
        if self.branch_exists(name.as_ref()) {
            return Err(KitError::BranchExists(name.to_string()));
        }

        self.update_branch(name, oid)
    }

    pub fn update_branch(&self, name: &RefName, oid: &ObjectId) -> Result<()> {
        tracing::debug!(branch = %name, %oid, "updating branch");
        self.write_ref_file(&self.heads_path().join(name.as_ref()), oid.as_ref())
    }

    pub fn read_tag(&self, name: &str) -> Result<Option<ObjectId>> {
        Self::read_ref_file(&self.tags_path().join(name))
    }

    pub fn create_tag(&self, name: &RefName, oid: &ObjectId) -> Result<()> {
        let tag_path = self.tags_path().join(name.as_ref());
        if tag_path.is_file() {
            return Err(KitError::TagExists(name.to_string()));
        }

        tracing::debug!(tag = %name, %oid, "creating tag");
        self.write_ref_file(&tag_path, oid.as_ref())
    }

    /// All branches with their tips, sorted by name
    pub fn list_branches(&self) -> Result<Vec<(String, ObjectId)>> {
        Self::list_refs(&self.heads_path())
    }

    /// All tags with the object they point at, sorted by name
    pub fn list_tags(&self) -> Result<Vec<(String, ObjectId)>> {
        Self::list_refs(&self.tags_path())
    }

    fn list_refs(base: &Path) -> Result<Vec<(String, ObjectId)>> {
        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let mut refs = Vec::new();
        for entry in WalkDir::new(base).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative_path) = entry.path().strip_prefix(base) else {
                continue;
            };
            if let Some(oid) = Self::read_ref_file(entry.path())? {
                let name = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                refs.push((name, oid));
            }
        }
        refs.sort();

        Ok(refs)
    }

    fn read_ref_file(path: &Path) -> Result<Option<ObjectId>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content)?))
    }

    fn write_ref_file(&self, path: &Path, content: &str) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| KitError::NotARepository(self.path.to_path_buf()))?;
        std::fs::create_dir_all(parent)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(path)?;

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    pub fn tags_path(&self) -> Box<Path> {
        self.refs_path().join("tags").into_boxed_path()
    }
}
