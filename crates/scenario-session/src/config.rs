//! Editor configuration
//!
//! Loaded from TOML, then adjusted by environment variables:
//!
//! ```toml
//! [api]
//! environment = "production"
//! base_url = "https://scenarios.example.org"
//! timeout_secs = 30
//!
//! [log]
//! filter = "scenario_session=debug,info"
//! json = false
//! ```

use scenario_client::{ClientConfig, Environment, UnknownEnvironment};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides `[api] base_url`
pub const ENV_API_URL: &str = "SCENARIO_EDITOR_API_URL";

/// Overrides `[api] environment`
pub const ENV_ENVIRONMENT: &str = "SCENARIO_EDITOR_ENV";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Environment(#[from] UnknownEnvironment),
}

/// `[log]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub api: ClientConfig,
    pub log: LogConfig,
}

impl EditorConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; empty values are ignored
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(environment) = value(ENV_ENVIRONMENT) {
            self.api.environment = environment.parse()?;
        }
        if let Some(url) = value(ENV_API_URL) {
            self.api.base_url = Some(url);
        }
        Ok(self)
    }

    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = Some(base_url.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.api.environment = environment;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log.filter = filter.into();
        self
    }
}
