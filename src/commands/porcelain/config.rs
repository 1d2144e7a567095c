use crate::areas::repository::Repository;
use crate::errors::Result;

impl Repository {
    /// Value of `section.key`, with the identity fallbacks for `user.name`
    /// and `user.email`
    pub fn config_get(&self, key: &str) -> Result<Option<String>> {
        match key {
            "user.name" => self.config().user_name().map(Some),
            "user.email" => self.config().user_email().map(Some),
            _ => self.config().get(key),
        }
    }

    pub fn config_set(&mut self, key: &str, value: &str) -> Result<()> {
        self.config_mut().set(key, value)?;
        tracing::debug!(key, value, "config updated");

        Ok(())
    }
}
