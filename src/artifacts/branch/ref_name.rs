use crate::artifacts::branch::INVALID_REF_NAME_REGEX;
use crate::errors::{KitError, Result};

/// Validated name of a branch or tag, relative to `refs/heads` or `refs/tags`
///
/// May contain `/` to nest refs in subdirectories (`feature/login`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefName(String);

impl RefName {
    pub fn try_parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name == "HEAD" {
            return Err(KitError::InvalidRefName(name));
        }

        let re = regex::Regex::new(INVALID_REF_NAME_REGEX)
            .map_err(|_| KitError::InvalidRefName(name.clone()))?;

        if re.is_match(&name) {
            Err(KitError::InvalidRefName(name))
        } else {
            Ok(Self(name))
        }
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
