//! Client configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Error};
use crate::types::BaseUrl;

/// Maximum number of record ids sent in one `catalogue/detail` request.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Environment variable holding the webservice base URL.
pub const ENV_BASE_URL: &str = "ALMA_BASE_URL";
/// Environment variable enabling request logging.
pub const ENV_ENABLE_LOGGING: &str = "ALMA_ENABLE_LOGGING";
/// Environment variable controlling parameter scrambling in logs.
pub const ENV_FILTER_PARAMS: &str = "ALMA_LOGGING_FILTER_PARAMS";
/// Environment variable overriding the detail batch size.
pub const ENV_BATCH_SIZE: &str = "ALMA_BATCH_SIZE";

/// Settings for an [`AlmaClient`](crate::AlmaClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the webservice, e.g. `https://alma.example.org/alma/`.
    pub base_url: String,
    /// Log every request URL at debug level.
    pub enable_logging: bool,
    /// Scramble sensitive parameters in logged URLs.
    pub filter_params: bool,
    /// Ids per `catalogue/detail` request.
    pub batch_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            enable_logging: false,
            filter_params: true,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ClientConfig {
    /// Defaults with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read configuration from `ALMA_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidEnv`] for values that cannot be
    /// interpreted. The base URL itself is checked by [`ClientConfig::validate`].
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(value) = lookup(ENV_ENABLE_LOGGING) {
            config.enable_logging = parse_flag(ENV_ENABLE_LOGGING, &value)?;
        }
        if let Some(value) = lookup(ENV_FILTER_PARAMS) {
            config.filter_params = parse_flag(ENV_FILTER_PARAMS, &value)?;
        }
        if let Some(value) = lookup(ENV_BATCH_SIZE) {
            config.batch_size =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigurationError::InvalidEnv {
                        name: ENV_BATCH_SIZE.to_string(),
                        value: value.clone(),
                    })?;
        }

        Ok(config)
    }

    /// Check the configuration, returning the parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid base URL or a zero batch
    /// size.
    pub fn validate(&self) -> Result<BaseUrl, Error> {
        if self.batch_size == 0 {
            return Err(ConfigurationError::InvalidBatchSize(self.batch_size).into());
        }
        BaseUrl::new(&self.base_url)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigurationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigurationError::InvalidEnv {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}
