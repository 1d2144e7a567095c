/// Difference between the index and the working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorkspaceChangeType {
    Untracked,
    Modified,
    Deleted,
}

impl WorkspaceChangeType {
    /// Short status code, as in `status --porcelain`
    pub fn code(&self) -> &'static str {
        match self {
            WorkspaceChangeType::Untracked => "??",
            WorkspaceChangeType::Modified => "M",
            WorkspaceChangeType::Deleted => "D",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkspaceChangeType::Untracked => "untracked:",
            WorkspaceChangeType::Modified => "modified:",
            WorkspaceChangeType::Deleted => "deleted:",
        }
    }
}

/// Difference between the HEAD commit's tree and the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexChangeType {
    Added,
    Modified,
    Deleted,
}

impl IndexChangeType {
    pub fn code(&self) -> &'static str {
        match self {
            IndexChangeType::Added => "A",
            IndexChangeType::Modified => "M",
            IndexChangeType::Deleted => "D",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IndexChangeType::Added => "new file:",
            IndexChangeType::Modified => "modified:",
            IndexChangeType::Deleted => "deleted:",
        }
    }
}

/// A path together with how it changed
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileChange<C> {
    pub path: String,
    pub change: C,
}

impl<C> FileChange<C> {
    pub fn new(path: impl Into<String>, change: C) -> Self {
        FileChange {
            path: path.into(),
            change,
        }
    }
}

impl std::fmt::Display for FileChange<IndexChangeType> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.change.code(), self.path)
    }
}

impl std::fmt::Display for FileChange<WorkspaceChangeType> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.change.code(), self.path)
    }
}
