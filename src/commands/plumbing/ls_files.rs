use crate::areas::repository::Repository;

impl Repository {
    /// Staged paths, sorted
    pub fn ls_files(&self) -> Vec<String> {
        self.index()
            .entries()
            .into_iter()
            .map(|entry| entry.name)
            .collect()
    }
}
