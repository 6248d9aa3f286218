//! Session configuration.
//!
//! A [`SessionConfig`] can be built in code, read from a YAML file, or
//! overridden from the environment:
//!
//! ```yaml
//! host: 127.0.0.1
//! port: 0            # 0 lets the OS pick a free port
//! fixtures_dir: tests/fixtures
//! verify_on_drop: true
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

pub const HOST_ENV: &str = "REQUEST_MATCHER_HOST";
pub const PORT_ENV: &str = "REQUEST_MATCHER_PORT";
pub const FIXTURES_ENV: &str = "REQUEST_MATCHER_FIXTURES";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    pub host: String,
    /// Port to bind (0 = OS-assigned)
    pub port: u16,
    /// Root directory of bundled fixture resources
    pub fixtures_dir: PathBuf,
    /// Run the end-of-session check when the server is dropped
    pub verify_on_drop: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("tests/fixtures")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 0,
            fixtures_dir: default_fixtures_dir(),
            verify_on_drop: true,
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by `REQUEST_MATCHER_*` environment variables.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::default().merge_env(|key| std::env::var(key).ok())
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: SessionConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.host.parse::<IpAddr>().is_err() {
            anyhow::bail!("host '{}' is not an IP address", self.host);
        }
        if self.fixtures_dir.as_os_str().is_empty() {
            anyhow::bail!("fixtures_dir must not be empty");
        }
        Ok(())
    }

    pub fn with_fixtures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixtures_dir = dir.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    fn merge_env<F>(mut self, lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV) {
            self.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port
                .parse()
                .with_context(|| format!("{PORT_ENV} must be a port number, got '{port}'"))?;
        }
        if let Some(dir) = lookup(FIXTURES_ENV) {
            self.fixtures_dir = PathBuf::from(dir);
        }
        self.validate()?;
        Ok(self)
    }
}
