use crate::types::{NameError, Timestamp};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{
    str::FromStr,
    sync::{LazyLock, Mutex, PoisonError},
};
use thiserror::Error as ThisError;
use ulid::{Generator, Ulid};

///
/// GENERATOR is lazily initiated with a Mutex
/// it has to keep state so ids minted in the same millisecond stay ordered
///

static GENERATOR: LazyLock<Mutex<Generator>> = LazyLock::new(|| Mutex::new(Generator::new()));

///
/// EntryIdError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EntryIdError {
    #[error("invalid entry id: '{0}'")]
    InvalidString(String),

    #[error("monotonic error - overflow")]
    GeneratorOverflow,
}

///
/// EntryId
/// Store-assigned identifier. Sorts in creation order.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct EntryId(Ulid);

impl EntryId {
    /// Mint a fresh id from the process-wide monotonic generator.
    pub fn generate() -> Result<Self, EntryIdError> {
        let mut generator = GENERATOR.lock().unwrap_or_else(PoisonError::into_inner);

        generator
            .generate()
            .map(Self)
            .map_err(|_| EntryIdError::GeneratorOverflow)
    }

    #[must_use]
    pub const fn from_parts(timestamp_ms: u64, random: u128) -> Self {
        Self(Ulid::from_parts(timestamp_ms, random))
    }
}

impl FromStr for EntryId {
    type Err = EntryIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s)
            .map(Self)
            .map_err(|_| EntryIdError::InvalidString(s.to_string()))
    }
}

///
/// OwnerId
/// Ephemeral submitter identity, minted once per client session.
///

#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Result<Self, NameError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(NameError::EmptyOwner);
        }

        Ok(Self(id))
    }

    /// Session id in the `user_<millis>` form used by the interactive client.
    #[must_use]
    pub fn session() -> Self {
        Self(format!("user_{}", Timestamp::now()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OwnerId {
    type Error = NameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<OwnerId> for String {
    fn from(id: OwnerId) -> Self {
        id.0
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_monotonic() {
        let a = EntryId::generate().unwrap();
        let b = EntryId::generate().unwrap();

        assert!(a < b);
    }

    #[test]
    fn entry_id_string_roundtrip() {
        let id = EntryId::from_parts(1_704_067_200_000, 7);
        let parsed: EntryId = id.to_string().parse().unwrap();

        assert_eq!(id, parsed);
    }

    #[test]
    fn entry_id_rejects_garbage() {
        let err = "not-an-id".parse::<EntryId>().unwrap_err();

        assert!(matches!(err, EntryIdError::InvalidString(_)));
    }

    #[test]
    fn session_owner_ids_use_user_prefix() {
        assert!(OwnerId::session().as_str().starts_with("user_"));
    }

    #[test]
    fn owner_id_rejects_blank() {
        assert_eq!(OwnerId::new("  "), Err(NameError::EmptyOwner));
    }
}
