//! Store credentials loaded from the process environment.
//!
//! Two trust levels exist. A [`ServiceAccount`] unlocks the elevated
//! [`AdminStore`](crate::store::AdminStore) and must never leave the server
//! process. A [`PublicConfig`] identifies an audience-scoped
//! [`ClientStore`](crate::store::ClientStore) and is safe to hand to clients.
//!
//! Both are read through a lookup function so the parsing rules can be
//! exercised without touching the real environment.

use serde::Deserialize;
use std::{fmt, path::PathBuf};
use thiserror::Error as ThisError;

pub const SERVICE_ACCOUNT_PATH_VAR: &str = "RAIDMETER_SERVICE_ACCOUNT_PATH";
pub const ADMIN_PROJECT_ID_VAR: &str = "RAIDMETER_ADMIN_PROJECT_ID";
pub const ADMIN_CLIENT_EMAIL_VAR: &str = "RAIDMETER_ADMIN_CLIENT_EMAIL";
pub const ADMIN_PRIVATE_KEY_VAR: &str = "RAIDMETER_ADMIN_PRIVATE_KEY";

pub const PUBLIC_API_KEY_VAR: &str = "RAIDMETER_PUBLIC_API_KEY";
pub const PUBLIC_PROJECT_ID_VAR: &str = "RAIDMETER_PUBLIC_PROJECT_ID";
pub const PUBLIC_APP_ID_VAR: &str = "RAIDMETER_PUBLIC_APP_ID";

const PEM_HEADER: &str = "-----BEGIN";

///
/// ConfigError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error(
        "store credentials not configured. Missing: {}. Set {SERVICE_ACCOUNT_PATH_VAR} or the RAIDMETER_ADMIN_* variables",
        .vars.join(", ")
    )]
    Missing { vars: Vec<String> },

    #[error("public store config incomplete. Missing: {}", .vars.join(", "))]
    MissingPublic { vars: Vec<String> },

    #[error("cannot read service account file {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("private key is not PEM encoded (after unescaping \\n)")]
    InvalidKey,
}

///
/// ServiceAccount
/// Elevated store identity. `Debug` never prints the key.
///

#[derive(Clone, Deserialize, Eq, PartialEq)]
pub struct ServiceAccount {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
}

impl ServiceAccount {
    /// Load from the real process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// A key file named by `RAIDMETER_SERVICE_ACCOUNT_PATH` wins; otherwise
    /// the three `RAIDMETER_ADMIN_*` variables are all required.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(SERVICE_ACCOUNT_PATH_VAR) {
            return Self::from_file(PathBuf::from(path));
        }

        let project_id = get(ADMIN_PROJECT_ID_VAR);
        let client_email = get(ADMIN_CLIENT_EMAIL_VAR);
        let private_key = get(ADMIN_PRIVATE_KEY_VAR).map(|k| unescape_private_key(&k));

        match (project_id, client_email, private_key) {
            (Some(project_id), Some(client_email), Some(private_key)) => Self {
                project_id,
                client_email,
                private_key,
            }
            .checked(),
            (project_id, client_email, private_key) => {
                let mut vars = Vec::new();
                if project_id.is_none() {
                    vars.push(ADMIN_PROJECT_ID_VAR.to_string());
                }
                if client_email.is_none() {
                    vars.push(ADMIN_CLIENT_EMAIL_VAR.to_string());
                }
                if private_key.is_none() {
                    vars.push(ADMIN_PRIVATE_KEY_VAR.to_string());
                }

                Err(ConfigError::Missing { vars })
            }
        }
    }

    /// Load a JSON key file with `project_id`, `client_email`, `private_key`.
    pub fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let unreadable = |reason: String| ConfigError::Unreadable {
            path: path.clone(),
            reason,
        };

        let content = std::fs::read_to_string(&path).map_err(|e| unreadable(e.to_string()))?;
        let mut account: Self =
            serde_json::from_str(&content).map_err(|e| unreadable(e.to_string()))?;
        account.private_key = unescape_private_key(&account.private_key);

        account.checked()
    }

    /// Verify that the key material looks usable.
    pub fn checked(self) -> Result<Self, ConfigError> {
        if self.private_key.starts_with(PEM_HEADER) {
            Ok(self)
        } else {
            Err(ConfigError::InvalidKey)
        }
    }
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &format_args!("<{} bytes>", self.private_key.len()))
            .finish()
    }
}

///
/// PublicConfig
/// Audience-scoped client identity. Not secret, but kept out of logs anyway.
///

#[derive(Clone, Deserialize, Eq, PartialEq)]
pub struct PublicConfig {
    pub api_key: String,
    pub project_id: String,
    pub app_id: String,
}

impl PublicConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(PUBLIC_API_KEY_VAR);
        let project_id = get(PUBLIC_PROJECT_ID_VAR);
        let app_id = get(PUBLIC_APP_ID_VAR);

        if let (Some(api_key), Some(project_id), Some(app_id)) =
            (api_key.clone(), project_id.clone(), app_id.clone())
        {
            return Ok(Self {
                api_key,
                project_id,
                app_id,
            });
        }

        let vars = [
            (PUBLIC_API_KEY_VAR, api_key.is_none()),
            (PUBLIC_PROJECT_ID_VAR, project_id.is_none()),
            (PUBLIC_APP_ID_VAR, app_id.is_none()),
        ]
        .into_iter()
        .filter(|(_, missing)| *missing)
        .map(|(var, _)| var.to_string())
        .collect();

        Err(ConfigError::MissingPublic { vars })
    }
}

impl fmt::Debug for PublicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicConfig")
            .field("project_id", &self.project_id)
            .field("app_id", &self.app_id)
            .finish_non_exhaustive()
    }
}

/// Turn a single-line environment value back into PEM.
///
/// Hosting dashboards store multi-line keys with literal `\n` sequences;
/// those become real newlines and surrounding whitespace is trimmed.
#[must_use]
pub fn unescape_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n").trim().to_string()
}

///
/// TESTS
///
