use crate::areas::refs::Head;
use crate::artifacts::status::file_change::{FileChange, IndexChangeType, WorkspaceChangeType};

/// Result of `status`, every list sorted by path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub head: Head,
    /// Files in the working tree that the index does not know about
    pub untracked: Vec<String>,
    /// Changes between the HEAD commit and the index
    pub staged: Vec<FileChange<IndexChangeType>>,
    /// Changes between the index and the working tree
    pub unstaged: Vec<FileChange<WorkspaceChangeType>>,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.untracked.is_empty() && self.staged.is_empty() && self.unstaged.is_empty()
    }

    pub fn staged_paths(&self) -> Vec<&str> {
        self.staged.iter().map(|change| change.path.as_str()).collect()
    }

    pub fn unstaged_paths(&self) -> Vec<&str> {
        self.unstaged.iter().map(|change| change.path.as_str()).collect()
    }
}
