//! Client configuration
//!
//! Settings are passed to [`UserDirectoryClient`](crate::data::UserDirectoryClient)
//! as an explicit [`ClientConfig`]. They can be built in code or loaded from an
//! `appsettings.json`-style file:
//!
//! ```json
//! { "ReqresApi": { "BaseUrl": "https://reqres.in/api", "ApiKey": "reqres-free-v1" } }
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::data::decode;

/// Name of the settings file looked up in the working and config directories
pub const SETTINGS_FILE_NAME: &str = "appsettings.json";

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while loading or applying configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No base URL was configured
    #[error("BaseUrl is required but was not configured")]
    MissingBaseUrl,

    /// The HTTP transport could not be built
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The API key cannot be sent as an HTTP header value
    #[error("ApiKey is not a valid HTTP header value")]
    InvalidApiKey,
}

/// Settings for the user directory client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root of the REST API, without a trailing slash (e.g. "https://reqres.in/api")
    pub base_url: String,
    /// Key sent as the `x-api-key` header, if any
    pub api_key: Option<String>,
    /// Per-request timeout applied by the HTTP transport
    pub timeout: Duration,
}

/// Shape of the settings file; keys are matched case-insensitively
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(rename = "reqresapi", default)]
    api: ApiSection,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSection {
    #[serde(rename = "baseurl")]
    base_url: Option<String>,
    #[serde(rename = "apikey")]
    api_key: Option<String>,
    #[serde(rename = "timeoutsecs")]
    timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Creates a config for `base_url` with no API key and the default timeout
    ///
    /// # Returns
    /// * `Err(ConfigError::MissingBaseUrl)` if `base_url` is blank
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(&base_url.into()).ok_or(ConfigError::MissingBaseUrl)?;
        Ok(Self {
            base_url,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Sets the API key; a blank key is treated as no key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = non_blank(api_key.into());
        self
    }

    /// Sets the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Loads the config from a settings file
    ///
    /// # Arguments
    /// * `path` - Path to a JSON file with a `ReqresApi` section
    ///
    /// # Returns
    /// * `Ok(ClientConfig)` if the file is readable and names a base URL
    /// * `Err(ConfigError)` otherwise
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let overrides = ConfigOverrides::from_file(path)?;
        overrides.resolve()
    }

    /// Default location of the settings file (`<config dir>/userdir/appsettings.json`)
    ///
    /// Returns `None` if the platform config directory cannot be determined.
    pub fn default_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "userdir")?;
        Some(project_dirs.config_dir().join(SETTINGS_FILE_NAME))
    }
}

/// Partially-specified settings, merged from several sources before resolving
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
}

impl ConfigOverrides {
    /// Reads the settings file at `path`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: SettingsFile =
            decode::decode(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            base_url: settings.api.base_url,
            api_key: settings.api.api_key,
            timeout: settings.api.timeout_secs.map(Duration::from_secs),
        })
    }

    /// Layers `other` on top of `self`; values set in `other` win
    pub fn merge(self, other: ConfigOverrides) -> Self {
        Self {
            base_url: other.base_url.or(self.base_url),
            api_key: other.api_key.or(self.api_key),
            timeout: other.timeout.or(self.timeout),
        }
    }

    /// Turns the merged settings into a [`ClientConfig`]
    pub fn resolve(self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::new(self.base_url.unwrap_or_default())?;
        if let Some(api_key) = self.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        Ok(config)
    }
}

fn normalize_base_url(raw: &str) -> Option<String> {
    non_blank(raw.trim().trim_end_matches('/').to_string())
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_settings(content: &str) -> (PathBuf, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, content).expect("Failed to write settings");
        (path, temp_dir)
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = ClientConfig::new("https://reqres.in/api/").unwrap();
        assert_eq!(config.base_url, "https://reqres.in/api");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_new_rejects_blank_base_url() {
        assert!(matches!(ClientConfig::new("   "), Err(ConfigError::MissingBaseUrl)));
        assert!(matches!(ClientConfig::new("/"), Err(ConfigError::MissingBaseUrl)));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let config = ClientConfig::new("http://localhost").unwrap().with_api_key("  ");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_from_file_reads_reqres_section() {
        let (path, _temp_dir) = write_settings(
            r#"{
                "Logging": { "LogLevel": { "Default": "Warning" } },
                "ReqresApi": {
                    "BaseUrl": "https://reqres.in/api",
                    "ApiKey": "reqres-free-v1",
                    "TimeoutSecs": 5
                }
            }"#,
        );

        let config = ClientConfig::from_file(&path).expect("Failed to load config");

        assert_eq!(config.base_url, "https://reqres.in/api");
        assert_eq!(config.api_key.as_deref(), Some("reqres-free-v1"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_file_without_base_url_fails() {
        let (path, _temp_dir) = write_settings(r#"{"ReqresApi": {"ApiKey": "k"}}"#);

        let result = ClientConfig::from_file(&path);

        assert!(matches!(result, Err(ConfigError::MissingBaseUrl)));
    }

    #[test]
    fn test_from_file_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = ClientConfig::from_file(&temp_dir.path().join("nope.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_from_file_malformed_json() {
        let (path, _temp_dir) = write_settings("{ not json");
        let result = ClientConfig::from_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_merge_prefers_later_values() {
        let file = ConfigOverrides {
            base_url: Some("https://from-file".to_string()),
            api_key: Some("file-key".to_string()),
            timeout: Some(Duration::from_secs(10)),
        };
        let cli = ConfigOverrides {
            base_url: Some("https://from-cli".to_string()),
            ..Default::default()
        };

        let config = file.merge(cli).resolve().unwrap();

        assert_eq!(config.base_url, "https://from-cli");
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_default_path_names_settings_file() {
        if let Some(path) = ClientConfig::default_path() {
            assert!(path.ends_with(SETTINGS_FILE_NAME));
            assert!(path.to_string_lossy().contains("userdir"));
        }
        // Passes if no home directory is available (e.g., in CI)
    }
}
