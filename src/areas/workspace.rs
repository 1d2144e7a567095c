//! Working directory access
//!
//! Every path handed out by the workspace is relative to the repository
//! root and `/`-separated, which is also how the index and trees name
//! files. The metadata directory is never listed.

use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::errors::{KitError, Result};
use bytes::Bytes;
use is_executable::IsExecutable;
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Name of the repository metadata directory
pub const META_DIR: &str = ".kit";

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn absolute(&self, name: &str) -> PathBuf {
        if name.is_empty() {
            self.path.to_path_buf()
        } else {
            self.path.join(name)
        }
    }

    /// Name of `path` relative to the root, `""` for the root itself
    ///
    /// Relative paths are taken relative to the root. The final component is
    /// not resolved, so a symlink is named as itself rather than its target.
    pub fn relative_name(&self, path: &Path) -> Result<String> {
        let joined = normalize(&self.path.join(path));
        let resolved = match (joined.parent(), joined.file_name()) {
            (Some(parent), Some(file_name)) if parent.exists() => {
                std::fs::canonicalize(parent)?.join(file_name)
            }
            _ => joined,
        };

        let relative = resolved
            .strip_prefix(&self.path)
            .map_err(|_| KitError::PathOutsideRepository(path.to_path_buf()))?;

        Ok(to_name(relative))
    }

    /// Whether `name` is the metadata directory or lies inside it
    pub fn is_metadata_path(name: &str) -> bool {
        name == META_DIR || name.starts_with(&format!("{META_DIR}/"))
    }

    pub fn exists(&self, name: &str) -> bool {
        std::fs::symlink_metadata(self.absolute(name)).is_ok()
    }

    /// Whether `name` is a real directory (symlinks to directories are files)
    pub fn is_dir(&self, name: &str) -> bool {
        std::fs::symlink_metadata(self.absolute(name)).is_ok_and(|stat| stat.is_dir())
    }

    /// Immediate children of the directory `name`, sorted, without the metadata directory
    pub fn list_dir(&self, name: &str) -> Result<Vec<String>> {
        let dir_path = self.absolute(name);
        if !dir_path.is_dir() {
            return Err(KitError::DirectoryNotFound(dir_path));
        }

        let mut children = std::fs::read_dir(&dir_path)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .filter_map(|path| path.strip_prefix(&self.path).ok().map(to_name))
            .filter(|child| !Self::is_metadata_path(child))
            .collect::<Vec<_>>();
        children.sort();

        Ok(children)
    }

    /// Every file or symlink at or below `name`, sorted
    pub fn list_files(&self, name: &str) -> Result<Vec<String>> {
        let root = self.absolute(name);
        if !self.exists(name) {
            return Err(KitError::FileNotFound(root));
        }
        // a symlink root is a file, even when it points at a directory
        if !self.is_dir(name) {
            return Ok(vec![name.to_string()]);
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != META_DIR);

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(&self.path) {
                files.push(to_name(relative));
            }
        }
        files.sort();

        Ok(files)
    }

    /// Content to hash for `name`: file bytes, or the target of a symlink
    pub fn read_file(&self, name: &str) -> Result<Bytes> {
        Self::read_path(&self.absolute(name))
    }

    /// Like [`Workspace::read_file`], for any path on disk
    pub fn read_path(file_path: &Path) -> Result<Bytes> {
        let stat = std::fs::symlink_metadata(file_path)
            .map_err(|_| KitError::FileNotFound(file_path.to_path_buf()))?;

        if stat.file_type().is_symlink() {
            let target = std::fs::read_link(file_path)?;
            return Ok(Bytes::copy_from_slice(target.as_os_str().as_bytes()));
        }
        if stat.is_dir() {
            return Err(KitError::FileNotFound(file_path.to_path_buf()));
        }

        Ok(Bytes::from(std::fs::read(file_path)?))
    }

    /// Mode `name` would be staged with
    pub fn file_mode(&self, name: &str) -> Result<EntryMode> {
        let file_path = self.absolute(name);
        let stat = std::fs::symlink_metadata(&file_path)
            .map_err(|_| KitError::FileNotFound(file_path.clone()))?;

        Ok(if stat.file_type().is_symlink() {
            EntryMode::Symlink
        } else if stat.is_dir() {
            EntryMode::Directory
        } else if file_path.is_executable() {
            EntryMode::File(FileMode::Executable)
        } else {
            EntryMode::File(FileMode::Regular)
        })
    }

    /// Materialize `data` at `name`, replacing whatever is there
    ///
    /// Symlink entries hold the link target as their content.
    pub fn write_file(&self, name: &str, data: &[u8], mode: EntryMode) -> Result<()> {
        let file_path = self.absolute(name);

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if let Ok(stat) = std::fs::symlink_metadata(&file_path) {
            if stat.is_dir() {
                std::fs::remove_dir_all(&file_path)?;
            } else {
                std::fs::remove_file(&file_path)?;
            }
        }

        match mode {
            EntryMode::Symlink => {
                let target = PathBuf::from(std::ffi::OsStr::from_bytes(data));
                std::os::unix::fs::symlink(target, &file_path)?;
            }
            _ => {
                use std::os::unix::fs::PermissionsExt;

                std::fs::write(&file_path, data)?;
                let permissions = if mode.is_executable() { 0o755 } else { 0o644 };
                std::fs::set_permissions(&file_path, std::fs::Permissions::from_mode(permissions))?;
            }
        }

        Ok(())
    }

    /// Delete `name` and then every directory it leaves empty, up to the root
    pub fn remove_file(&self, name: &str) -> Result<()> {
        let file_path = self.absolute(name);

        match std::fs::remove_file(&file_path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        let mut parent = file_path.parent();
        while let Some(dir) = parent {
            if dir == self.path.as_ref() || !dir.starts_with(&self.path) {
                break;
            }
            // stops at the first directory that still has children
            if std::fs::remove_dir(dir).is_err() {
                break;
            }
            parent = dir.parent();
        }

        Ok(())
    }
}

/// Resolve `.` and `..` without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    normalized
}

fn to_name(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        dir.child(".kit/objects").create_dir_all().unwrap();
        dir.child("a.txt").write_str("a").unwrap();
        dir.child("src/main.rs").write_str("fn main() {}").unwrap();
        dir.child("src/nested/deep.txt").write_str("deep").unwrap();
        dir
    }

    fn workspace(dir: &TempDir) -> Workspace {
        let root = std::fs::canonicalize(dir.path()).unwrap();
        Workspace::new(root.into_boxed_path())
    }

    #[rstest]
    fn lists_children_without_metadata_dir(dir: TempDir) {
        let workspace = workspace(&dir);

        assert_eq!(workspace.list_dir("").unwrap(), vec!["a.txt", "src"]);
        assert_eq!(workspace.list_dir("src").unwrap(), vec!["src/main.rs", "src/nested"]);
    }

    #[rstest]
    fn lists_files_recursively(dir: TempDir) {
        let workspace = workspace(&dir);

        assert_eq!(
            workspace.list_files("").unwrap(),
            vec!["a.txt", "src/main.rs", "src/nested/deep.txt"]
        );
        assert_eq!(workspace.list_files("a.txt").unwrap(), vec!["a.txt"]);
    }

    #[rstest]
    fn names_paths_relative_to_root(dir: TempDir) {
        let workspace = workspace(&dir);

        assert_eq!(workspace.relative_name(Path::new("src/./main.rs")).unwrap(), "src/main.rs");
        assert_eq!(
            workspace
                .relative_name(&workspace.path().join("src/nested/../main.rs"))
                .unwrap(),
            "src/main.rs"
        );
        assert!(matches!(
            workspace.relative_name(Path::new("../elsewhere")),
            Err(KitError::PathOutsideRepository(_))
        ));
    }

    #[rstest]
    fn removing_the_last_file_prunes_empty_dirs(dir: TempDir) {
        let workspace = workspace(&dir);

        workspace.remove_file("src/nested/deep.txt").unwrap();

        assert!(!workspace.exists("src/nested"));
        assert!(workspace.exists("src/main.rs"));
    }

    #[rstest]
    fn writes_executables_and_symlinks(dir: TempDir) {
        let workspace = workspace(&dir);

        workspace
            .write_file("bin/run.sh", b"#!/bin/sh\n", EntryMode::File(FileMode::Executable))
            .unwrap();
        workspace.write_file("link", b"a.txt", EntryMode::Symlink).unwrap();

        assert_eq!(
            workspace.file_mode("bin/run.sh").unwrap(),
            EntryMode::File(FileMode::Executable)
        );
        assert_eq!(workspace.file_mode("link").unwrap(), EntryMode::Symlink);
        assert_eq!(workspace.read_file("link").unwrap(), Bytes::from_static(b"a.txt"));
    }

    #[test]
    fn recognises_metadata_paths() {
        assert!(Workspace::is_metadata_path(".kit"));
        assert!(Workspace::is_metadata_path(".kit/index"));
        assert!(!Workspace::is_metadata_path(".kitten"));
    }
}
