use crate::catalog::{self, CatalogError, ToolDescriptor};
use pravaah_api::{ApiError, DEFAULT_BASE_URL, StationClient};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_DIR: &str = "~/.config/pravaah";
pub const LOG_FILE_NAME: &str = "pravaah.log";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Settings resolved from the command line and environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub timeout: Option<Duration>,
    pub tools_file: Option<PathBuf>,
    pub config_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            tools_file: None,
            config_dir: expand_path(DEFAULT_CONFIG_DIR),
        }
    }
}

impl Config {
    pub fn client(&self) -> Result<StationClient, ConfigError> {
        Ok(StationClient::with_timeout(&self.api_base, self.timeout)?)
    }

    /// The tools file if one was given, otherwise the built-in catalog.
    pub fn tools(&self) -> Result<Vec<ToolDescriptor>, ConfigError> {
        match &self.tools_file {
            Some(path) => Ok(catalog::load_tools(path)?),
            None => Ok(catalog::default_tools()),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.config_dir.join(LOG_FILE_NAME)
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
