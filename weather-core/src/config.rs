use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Debug},
    fs, io,
    path::{Path, PathBuf},
};

/// Credential file looked up relative to the working directory.
pub const DEFAULT_API_CONFIG_PATH: &str = ".apiConfig";

/// Credentials for the upstream weather API.
///
/// Example JSON:
/// {"OpenWeatherMapApiKey": "..."}
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(rename = "OpenWeatherMapApiKey")]
    pub api_key: String,
}

impl Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig").field("api_key", &"<redacted>").finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into() }
    }

    /// Read and parse the credential file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        serde_json::from_str(&contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }
}

/// Somewhere an [`ApiConfig`] can be obtained from, once per weather lookup.
pub trait ConfigSource: Send + Sync + Debug {
    fn api_config(&self) -> Result<ApiConfig, ConfigError>;
}

/// Re-reads the credential file on every call, so edits apply to the next lookup.
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigSource {
    fn default() -> Self {
        Self::new(DEFAULT_API_CONFIG_PATH)
    }
}

impl ConfigSource for FileConfigSource {
    fn api_config(&self) -> Result<ApiConfig, ConfigError> {
        ApiConfig::load(&self.path)
    }
}

/// Fixed in-memory credentials.
#[derive(Debug, Clone)]
pub struct StaticConfigSource(pub ApiConfig);

impl ConfigSource for StaticConfigSource {
    fn api_config(&self) -> Result<ApiConfig, ConfigError> {
        Ok(self.0.clone())
    }
}
