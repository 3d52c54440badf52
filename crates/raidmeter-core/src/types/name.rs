use crate::MAX_NAME_CHARS;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// NameError
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum NameError {
    #[error("please enter a name")]
    Empty,

    #[error("name is {len} characters long (limit {MAX_NAME_CHARS})")]
    TooLong { len: usize },

    #[error("owner id cannot be empty")]
    EmptyOwner,
}

///
/// PlayerName
/// Display name attached to every entry: trimmed, non-empty, capped length.
///

#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Trim and check a raw name. Length is counted in characters, not bytes.
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }

        let len = trimmed.chars().count();
        if len > MAX_NAME_CHARS {
            return Err(NameError::TooLong { len });
        }

        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = NameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let name = PlayerName::parse("  Ayla \n").unwrap();

        assert_eq!(name.as_str(), "Ayla");
    }

    #[test]
    fn rejects_blank_names() {
        assert_eq!(PlayerName::parse(""), Err(NameError::Empty));
        assert_eq!(PlayerName::parse(" \t "), Err(NameError::Empty));
    }

    #[test]
    fn caps_length_in_characters() {
        let exact = "가".repeat(MAX_NAME_CHARS);
        assert!(PlayerName::parse(&exact).is_ok());

        let long = "a".repeat(MAX_NAME_CHARS + 1);
        assert_eq!(
            PlayerName::parse(&long),
            Err(NameError::TooLong {
                len: MAX_NAME_CHARS + 1
            })
        );
    }

    #[test]
    fn deserialize_applies_the_same_rules() {
        let ok: PlayerName = serde_json::from_str("\" Kai \"").unwrap();
        assert_eq!(ok.as_str(), "Kai");

        assert!(serde_json::from_str::<PlayerName>("\"\"").is_err());
    }
}
