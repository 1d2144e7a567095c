use crate::areas::config::Config;
use crate::areas::refs::DEFAULT_BRANCH;
use crate::areas::repository::Repository;
use crate::artifacts::branch::ref_name::RefName;
use crate::errors::Result;
use std::fs;
use std::path::Path;

/// Result of `init`
#[derive(Debug)]
pub enum InitOutcome {
    Created(Repository),
    /// A `.kit` directory was already present and has been left untouched
    Reinitialized(Repository),
}

impl InitOutcome {
    pub fn repository(&self) -> &Repository {
        match self {
            InitOutcome::Created(repository) | InitOutcome::Reinitialized(repository) => repository,
        }
    }

    pub fn into_repository(self) -> Repository {
        match self {
            InitOutcome::Created(repository) | InitOutcome::Reinitialized(repository) => repository,
        }
    }

    pub fn is_reinitialized(&self) -> bool {
        matches!(self, InitOutcome::Reinitialized(_))
    }
}

impl Repository {
    /// Create `.kit` under `path`, creating `path` itself if needed
    ///
    /// Lays out `objects/`, `refs/heads/`, a `HEAD` on the unborn `master`
    /// branch and the default config.
    pub fn init(path: impl AsRef<Path>) -> Result<InitOutcome> {
        fs::create_dir_all(path.as_ref())?;
        let root = fs::canonicalize(path.as_ref())?;
        let repository = Repository::at(root.clone());

        if repository.meta_path().exists() {
            tracing::info!(path = %repository.meta_path().display(), "reinitialized existing repository");
            return Ok(InitOutcome::Reinitialized(Repository::open(root)?));
        }

        fs::create_dir_all(repository.database().objects_path())?;
        fs::create_dir_all(repository.refs().heads_path())?;
        repository
            .refs()
            .set_head_symbolic(&RefName::try_parse(DEFAULT_BRANCH)?)?;
        Config::with_defaults(repository.meta_path().join("config").into_boxed_path()).write()?;

        tracing::info!(path = %repository.meta_path().display(), "initialized empty repository");

        Ok(InitOutcome::Created(Repository::open(root)?))
    }
}
