//! Repository configuration (`.kit/config`)
//!
//! INI-like text: `[section]` headers followed by `\tkey = value` lines.
//! Keys are addressed as `section.key`. Sections and keys keep the order in
//! which they were first written.

use crate::errors::{KitError, Result};
use std::io::Write;
use std::path::Path;

const SECTION_REGEX: &str = r"^\[\s*([^\]\s]+)\s*\]$";
const ENTRY_REGEX: &str = r"^([^=\s]+)\s*=\s*(.*)$";

pub const DEFAULT_USER_NAME: &str = "Kit name";
pub const DEFAULT_USER_EMAIL: &str = "Kit email";

/// Settings written by `init`
const CORE_DEFAULTS: [(&str, &str); 4] = [
    ("repositoryformatversion", "0"),
    ("filemode", "true"),
    ("bare", "false"),
    ("logallrefupdates", "true"),
];

type Section = (String, Vec<(String, String)>);

#[derive(Debug)]
pub struct Config {
    path: Box<Path>,
    sections: Vec<Section>,
}

impl Config {
    pub fn new(path: Box<Path>) -> Self {
        Config {
            path,
            sections: Vec::new(),
        }
    }

    /// Configuration of a freshly initialised repository
    pub fn with_defaults(path: Box<Path>) -> Self {
        let core = CORE_DEFAULTS
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        Config {
            path,
            sections: vec![("core".to_string(), core)],
        }
    }

    /// Read the file, leaving the configuration empty when it does not exist
    pub fn load(&mut self) -> Result<()> {
        self.sections.clear();
        if !self.path.exists() {
            return Ok(());
        }

        let section_regex = Self::regex(SECTION_REGEX)?;
        let entry_regex = Self::regex(ENTRY_REGEX)?;

        for line in std::fs::read_to_string(&self.path)?.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(captures) = section_regex.captures(line) {
                self.section_mut(&captures[1]);
            } else if let Some(captures) = entry_regex.captures(line)
                && let Some((_, entries)) = self.sections.last_mut()
            {
                entries.push((captures[1].to_string(), captures[2].trim().to_string()));
            }
        }

        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let (section, key) = Self::split_key(key)?;

        Ok(self
            .sections
            .iter()
            .filter(|(name, _)| name == section)
            .flat_map(|(_, entries)| entries.iter())
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone()))
    }

    /// Set `section.key` to `value` and rewrite the file
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let (section, key) = Self::split_key(key)?;

        let entries = self.section_mut(section);
        match entries.iter_mut().find(|(name, _)| name == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => entries.push((key.to_string(), value.to_string())),
        }

        self.write()
    }

    pub fn user_name(&self) -> Result<String> {
        Ok(self
            .get("user.name")?
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()))
    }

    pub fn user_email(&self) -> Result<String> {
        Ok(self
            .get("user.email")?
            .unwrap_or_else(|| DEFAULT_USER_EMAIL.to_string()))
    }

    pub fn write(&self) -> Result<()> {
        let mut content = String::new();
        for (section, entries) in &self.sections {
            content.push_str(&format!("[{section}]\n"));
            for (key, value) in entries {
                content.push_str(&format!("\t{key} = {value}\n"));
            }
        }

        let parent = self
            .path
            .parent()
            .ok_or_else(|| KitError::NotARepository(self.path.to_path_buf()))?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(&self.path)?;

        Ok(())
    }

    fn section_mut(&mut self, section: &str) -> &mut Vec<(String, String)> {
        let position = match self.sections.iter().position(|(name, _)| name == section) {
            Some(position) => position,
            None => {
                self.sections.push((section.to_string(), Vec::new()));
                self.sections.len() - 1
            }
        };

        &mut self.sections[position].1
    }

    fn split_key(key: &str) -> Result<(&str, &str)> {
        match key.split_once('.') {
            Some((section, name)) if !section.is_empty() && !name.is_empty() => Ok((section, name)),
            _ => Err(KitError::InvalidConfigKey(key.to_string())),
        }
    }

    fn regex(pattern: &str) -> Result<regex::Regex> {
        regex::Regex::new(pattern).map_err(|err| KitError::InvalidConfigKey(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    fn config_path(dir: &TempDir) -> Box<Path> {
        dir.path().join("config").into_boxed_path()
    }

    #[test]
    fn writes_core_defaults() {
        let dir = TempDir::new().unwrap();

        Config::with_defaults(config_path(&dir)).write().unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("config")).unwrap(),
            "[core]\n\
             \trepositoryformatversion = 0\n\
             \tfilemode = true\n\
             \tbare = false\n\
             \tlogallrefupdates = true\n"
        );
    }

    #[test]
    fn set_values_survive_a_reload() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::with_defaults(config_path(&dir));
        config.set("user.name", "Ada Lovelace").unwrap();
        config.set("user.name", "Ada").unwrap();

        let mut reloaded = Config::new(config_path(&dir));
        reloaded.load().unwrap();

        assert_eq!(reloaded.get("user.name").unwrap(), Some("Ada".to_string()));
        assert_eq!(reloaded.get("core.bare").unwrap(), Some("false".to_string()));
        assert_eq!(reloaded.get("core.missing").unwrap(), None);
    }

    #[test]
    fn identity_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::with_defaults(config_path(&dir));

        assert_eq!(config.user_name().unwrap(), "Kit name");
        assert_eq!(config.user_email().unwrap(), "Kit email");
    }

    #[test]
    fn rejects_keys_without_a_section() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(config_path(&dir));

        assert!(matches!(
            config.get("name"),
            Err(KitError::InvalidConfigKey(_))
        ));
    }
}
