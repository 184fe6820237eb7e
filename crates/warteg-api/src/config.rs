//! # API Configuration
//!
//! Where the warteg API lives and how long to wait for it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     WARTEG_API_BASE_URL=http://192.168.1.10:8000                       │
//! │     WARTEG_API_TIMEOUT_SECS=10                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/pos/warteg.toml (Linux)                                  │
//! │     ~/Library/Application Support/com.warteg.pos/warteg.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8000, 30 second timeout                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # warteg.toml
//! base_url = "http://localhost:8000"
//! timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ApiError, ApiResult};

pub const ENV_BASE_URL: &str = "WARTEG_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "WARTEG_API_TIMEOUT_SECS";

/// Connection settings for the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Origin of the API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (warteg.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ApiResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading API config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.base_url = normalize_base_url(&config.base_url);
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Config(format!("base_url {:?}: {e}", self.base_url)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ApiError::Config("timeout_secs must be greater than 0".into()));
        }

        Ok(())
    }

    /// Replaces the base URL (e.g. from a command-line flag) and re-validates.
    pub fn with_base_url(mut self, base_url: &str) -> ApiResult<Self> {
        self.base_url = normalize_base_url(base_url);
        self.validate()?;
        Ok(self)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            debug!(url = %url, "Overriding base URL from environment");
            self.base_url = url;
        }

        if let Ok(timeout) = std::env::var(ENV_TIMEOUT_SECS) {
            match timeout.parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid {}", ENV_TIMEOUT_SECS),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "warteg", "pos")
            .map(|dirs| dirs.config_dir().join("warteg.toml"))
    }
}

/// Trims whitespace and trailing slashes.
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var(ENV_BASE_URL);
        std::env::remove_var(ENV_TIMEOUT_SECS);
    }

    fn missing_file() -> Option<PathBuf> {
        Some(std::env::temp_dir().join("warteg-config-that-does-not-exist.toml"))
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = ApiConfig::default();

        config.base_url = "ftp://files.example".into();
        assert!(config.validate().is_err());

        config.base_url = "not a url".into();
        assert!(config.validate().is_err());

        config.base_url = "https://api.warteg.id".into();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_load_from_file_strips_trailing_slash() {
        clear_env();
        let path = std::env::temp_dir().join(format!("warteg-test-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "base_url = \"http://10.0.0.5:8000/\"").unwrap();
        drop(file);

        let config = ApiConfig::load(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var(ENV_BASE_URL, "https://api.warteg.id/");
        std::env::set_var(ENV_TIMEOUT_SECS, "5");

        let config = ApiConfig::load(missing_file()).unwrap();
        clear_env();

        assert_eq!(config.base_url, "https://api.warteg.id");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    #[serial]
    fn test_invalid_env_timeout_is_ignored() {
        clear_env();
        std::env::set_var(ENV_TIMEOUT_SECS, "soon");

        let config = ApiConfig::load(missing_file()).unwrap();
        clear_env();

        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_with_base_url() {
        let config = ApiConfig::default().with_base_url("http://warteg.local:9000//").unwrap();
        assert_eq!(config.base_url, "http://warteg.local:9000");
        assert!(ApiConfig::default().with_base_url("warteg.local").is_err());
    }
}
