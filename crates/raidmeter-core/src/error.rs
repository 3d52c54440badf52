use crate::{
    config::ConfigError,
    types::{EntryIdError, NameError},
    validate::SampleError,
};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use thiserror::Error as ThisError;

///
/// Error
///
/// Structured error with a closed kind taxonomy plus the layer it came from.
/// Front ends map `kind` to user guidance; `message` is for logs.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// Construct a validation error raised before any store interaction.
    pub fn validation(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, origin, message)
    }

    /// Construct a caller-side timeout.
    pub fn timeout(what: &str, limit: Duration) -> Self {
        Self::new(
            ErrorKind::Timeout,
            ErrorOrigin::Submission,
            format!("{what} did not complete within {limit:?}"),
        )
    }

    /// Construct a store-origin failure of the given kind.
    pub fn store(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Store(kind), ErrorOrigin::Store, message)
    }

    /// Construct a store-origin error for an absent entry.
    pub fn not_found(id: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::NotFound,
            ErrorOrigin::Store,
            format!("entry not found: {id}"),
        )
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::Validation)
    }

    #[must_use]
    pub fn display_with_kind(&self) -> String {
        format!("{}:{}: {}", self.origin, self.kind, self.message)
    }
}

impl From<SampleError> for Error {
    fn from(err: SampleError) -> Self {
        Self::validation(ErrorOrigin::Validation, err.to_string())
    }
}

impl From<NameError> for Error {
    fn from(err: NameError) -> Self {
        Self::validation(ErrorOrigin::Validation, err.to_string())
    }
}

impl From<EntryIdError> for Error {
    fn from(err: EntryIdError) -> Self {
        match err {
            EntryIdError::InvalidString(_) => {
                Self::validation(ErrorOrigin::Interface, err.to_string())
            }
            EntryIdError::GeneratorOverflow => {
                Self::store(StoreErrorKind::Unavailable, err.to_string())
            }
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(
            ErrorKind::Store(StoreErrorKind::Misconfigured),
            ErrorOrigin::Config,
            err.to_string(),
        )
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers and the HTTP surface.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Input shape or content rejected before any I/O.
    Validation,

    /// The caller's wait on the store was exceeded.
    Timeout,

    /// Underlying persistence failure.
    Store(StoreErrorKind),

    /// Update or delete target does not exist.
    NotFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Timeout => write!(f, "timeout"),
            Self::Store(kind) => write!(f, "store.{kind}"),
            Self::NotFound => write!(f, "not_found"),
        }
    }
}

///
/// StoreErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StoreErrorKind {
    /// Access rules rejected the operation for these credentials.
    PermissionDenied,

    /// Credentials or store configuration are absent or malformed.
    Misconfigured,

    /// The backing store could not be reached or written.
    Unavailable,

    /// Persisted data could not be decoded.
    Corrupt,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PermissionDenied => "permission_denied",
            Self::Misconfigured => "misconfigured",
            Self::Unavailable => "unavailable",
            Self::Corrupt => "corrupt",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Validation,
    Store,
    Config,
    Submission,
    Interface,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Validation => "validation",
            Self::Store => "store",
            Self::Config => "config",
            Self::Submission => "submission",
            Self::Interface => "interface",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_errors_become_validation_kind() {
        let err: Error = SampleError::InvalidLength { len: 3 }.into();

        assert!(err.is_validation());
        assert_eq!(err.origin, ErrorOrigin::Validation);
    }

    #[test]
    fn display_with_kind_prefixes_origin_and_kind() {
        let err = Error::store(StoreErrorKind::PermissionDenied, "create denied");

        assert_eq!(
            err.display_with_kind(),
            "store:store.permission_denied: create denied"
        );
    }

    #[test]
    fn timeout_message_keeps_sub_second_limits() {
        let err = Error::timeout("saving entry", Duration::from_millis(250));

        assert_eq!(err.message, "saving entry did not complete within 250ms");
        assert_eq!(
            Error::timeout("loading totals", Duration::from_secs(10)).message,
            "loading totals did not complete within 10s"
        );
    }

    #[test]
    fn config_errors_are_misconfigured_store_errors() {
        let err: Error = ConfigError::Missing {
            vars: vec!["RAIDMETER_ADMIN_PROJECT_ID".to_string()],
        }
        .into();

        assert_eq!(err.kind, ErrorKind::Store(StoreErrorKind::Misconfigured));
        assert_eq!(err.origin, ErrorOrigin::Config);
    }
}
