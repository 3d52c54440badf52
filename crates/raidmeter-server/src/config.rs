//! Server configuration from `raidmeter.toml`.
//!
//! The file is optional. When `--config` is not given it is discovered by
//! walking up from the current directory. `PORT` and `RAIDMETER_DATA_DIR`
//! override whatever the file says.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

/// File name looked for during discovery.
pub const CONFIG_FILE: &str = "raidmeter.toml";

pub const PORT_VAR: &str = "PORT";
pub const DATA_DIR_VAR: &str = "RAIDMETER_DATA_DIR";

/// Server configuration
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    /// Directory holding one sub-directory per project
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Wait applied to each store call made by a request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            data_dir: default_data_dir(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
const fn default_request_timeout_secs() -> u64 {
    raidmeter_core::DEFAULT_STORE_TIMEOUT_SECS
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

        Ok(config)
    }

    /// Walk up from `start` looking for [`CONFIG_FILE`].
    pub fn discover_from(start: impl AsRef<Path>) -> anyhow::Result<Option<Self>> {
        let mut dir = start.as_ref().to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.exists() {
                return Self::load(&candidate).map(Some);
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Explicit file, else discovered file, else defaults; then the environment.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => {
                let cwd = std::env::current_dir().context("reading current directory")?;
                Self::discover_from(cwd)?.unwrap_or_default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Apply `PORT` and `RAIDMETER_DATA_DIR` from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(port) = lookup(PORT_VAR).filter(|v| !v.trim().is_empty()) {
            let port: u16 = port
                .trim()
                .parse()
                .with_context(|| format!("{PORT_VAR} is not a port number: '{port}'"))?;
            self.bind.set_port(port);
        }
        if let Some(dir) = lookup(DATA_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }

        Ok(())
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_documented_values() {
        let config = ServerConfig::default();

        assert_eq!(config.bind.to_string(), "0.0.0.0:8080");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ServerConfig = toml::from_str(r#"data_dir = "/srv/raidmeter""#).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/raidmeter"));
        assert_eq!(config.bind, default_bind());
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn discovery_walks_up_to_the_nearest_file() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            root.path().join(CONFIG_FILE),
            "bind = \"127.0.0.1:9000\"\nrequest_timeout_secs = 3\n",
        )
        .unwrap();

        let config = ServerConfig::discover_from(&nested).unwrap().unwrap();

        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn broken_file_is_an_error() {
        let root = TempDir::new().unwrap();
        let path = root.path().join(CONFIG_FILE);
        std::fs::write(&path, "bind = 12").unwrap();

        assert!(ServerConfig::load(&path).is_err());
    }

    #[test]
    fn environment_overrides_the_file() {
        let vars: HashMap<&str, &str> = [(PORT_VAR, "3000"), (DATA_DIR_VAR, "/tmp/raid")].into();
        let mut config = ServerConfig::default();

        config
            .apply_env(|key| vars.get(key).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.bind.to_string(), "0.0.0.0:3000");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/raid"));
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut config = ServerConfig::default();

        let err = config
            .apply_env(|key| (key == PORT_VAR).then(|| "eighty".to_string()))
            .unwrap_err();

        assert!(err.to_string().contains(PORT_VAR));
    }
}
