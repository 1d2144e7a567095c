use crate::errors::{KitError, Result};

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
}

/// Mode of a tree or index entry
///
/// Rendered as the ASCII octal string used in tree objects and stored as the
/// octal-parsed integer in index entries.
#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum EntryMode {
    File(FileMode),
    Symlink,
    Directory,
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::File(FileMode::Regular)
    }
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::File(FileMode::Regular) => "100644",
            EntryMode::File(FileMode::Executable) => "100755",
            EntryMode::Symlink => "120000",
            EntryMode::Directory => "40000",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
            EntryMode::Symlink => 0o120000,
            EntryMode::Directory => 0o40000,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    pub fn is_executable(&self) -> bool {
        matches!(self, EntryMode::File(FileMode::Executable))
    }
}

impl TryFrom<u32> for EntryMode {
    type Error = KitError;

    fn try_from(mode: u32) -> Result<Self> {
        match mode {
            0o100644 => Ok(EntryMode::File(FileMode::Regular)),
            0o100755 => Ok(EntryMode::File(FileMode::Executable)),
            0o120000 => Ok(EntryMode::Symlink),
            0o40000 => Ok(EntryMode::Directory),
            _ => Err(KitError::InvalidMode(format!("{mode:o}"))),
        }
    }
}

impl TryFrom<&str> for EntryMode {
    type Error = KitError;

    fn try_from(value: &str) -> Result<Self> {
        let mode = u32::from_str_radix(value.trim(), 8)
            .map_err(|_| KitError::InvalidMode(value.to_string()))?;

        EntryMode::try_from(mode)
    }
}

impl From<FileMode> for EntryMode {
    fn from(mode: FileMode) -> Self {
        EntryMode::File(mode)
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("100644", EntryMode::File(FileMode::Regular))]
    #[case("100755", EntryMode::File(FileMode::Executable))]
    #[case("120000", EntryMode::Symlink)]
    #[case("40000", EntryMode::Directory)]
    #[case("040000", EntryMode::Directory)]
    fn parses_octal_mode_strings(#[case] raw: &str, #[case] expected: EntryMode) {
        pretty_assertions::assert_eq!(EntryMode::try_from(raw).unwrap(), expected);
        pretty_assertions::assert_eq!(EntryMode::try_from(expected.as_u32()).unwrap(), expected);
    }

    #[rstest]
    #[case("100600")]
    #[case("abc")]
    #[case("")]
    fn rejects_unknown_modes(#[case] raw: &str) {
        assert!(matches!(EntryMode::try_from(raw), Err(KitError::InvalidMode(_))));
    }
}
