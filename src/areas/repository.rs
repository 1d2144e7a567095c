use crate::areas::config::Config;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{META_DIR, Workspace};
use crate::errors::{KitError, Result};
use std::path::{Path, PathBuf};

/// A working tree together with its `.kit` metadata directory
///
/// Every area is constructed once per session from the explicit root; no
/// operation depends on the process working directory.
#[derive(Debug)]
pub struct Repository {
    path: Box<Path>,
    database: Database,
    index: Index,
    refs: Refs,
    workspace: Workspace,
    config: Config,
}

impl Repository {
    /// Open the repository rooted at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let root = std::fs::canonicalize(path)
            .map_err(|_| KitError::NotARepository(path.to_path_buf()))?;

        if !root.join(META_DIR).is_dir() {
            return Err(KitError::NotARepository(root));
        }

        let mut repository = Self::at(root);
        repository.index.load()?;
        repository.config.load()?;

        Ok(repository)
    }

    /// Areas for `root` without touching the disk
    pub(crate) fn at(root: PathBuf) -> Self {
        let meta_path = root.join(META_DIR);

        Repository {
            database: Database::new(meta_path.join("objects").into_boxed_path()),
            index: Index::new(
                meta_path.join("index").into_boxed_path(),
                root.clone().into_boxed_path(),
            ),
            refs: Refs::new(meta_path.clone().into_boxed_path()),
            workspace: Workspace::new(root.clone().into_boxed_path()),
            config: Config::new(meta_path.join("config").into_boxed_path()),
            path: root.into_boxed_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn meta_path(&self) -> PathBuf {
        self.path.join(META_DIR)
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut Index {
        &mut self.index
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}
