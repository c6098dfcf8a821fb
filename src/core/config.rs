//! Loading the account configuration.
//!
//! Values are resolved in this order (highest priority first):
//! 1. Environment variables (`NRQL_CHART_*`)
//! 2. The JSON config file
//! 3. Default values, for the optional keys only

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Json},
};
use serde::{Deserialize, Serialize};

use crate::core::{ChartError, Result, error::ChartErrorKind};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_ENDPOINT: &str = "https://api.newrelic.com/graphql";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const ENV_PREFIX: &str = "NRQL_CHART_";

const CONFIG_SHAPE_HINT: &str =
    r#"expected a JSON file like {"api_key": "YOUR_API_KEY", "account_id": 1234567}"#;

/// Credentials and connection settings for a single invocation.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Configuration {
    pub api_key: String,
    pub account_id: u64,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

// The API key stays out of logs.
impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("api_key", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Configuration {
    pub fn from_figment(figment: &Figment, path: &Path) -> Result<Self> {
        figment.extract().map_err(|e| {
            ChartError::from(ChartErrorKind::ConfigMalformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
            .with_hint(Some(CONFIG_SHAPE_HINT))
        })
    }

    /// Read the config file at `path`, with env overrides applied on top.
    ///
    /// The file alone must hold every required key; env vars can only
    /// override values that are already there.
    pub fn load(path: &Path) -> Result<Self> {
        let figment = create_figment_from_file(path)?;
        Self::from_figment(&Figment::from(Json::file(path)), path)?;

        let config = Self::from_figment(&figment, path)?;
        config.validate(path)?;

        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let reason = if self.api_key.trim().is_empty() {
            "api_key is empty"
        } else if self.timeout_secs == 0 {
            "timeout_secs must be at least 1"
        } else {
            return Ok(());
        };

        Err(ChartError::from(ChartErrorKind::ConfigMalformed {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }))
    }
}

/// Build the layered figment for a config file. The file itself must exist.
pub fn create_figment_from_file(path: &Path) -> Result<Figment> {
    if !path.is_file() {
        return Err(ChartError::from(ChartErrorKind::ConfigNotFound {
            path: PathBuf::from(path),
        })
        .with_hint(Some(format!("create it, {CONFIG_SHAPE_HINT}"))));
    }

    Ok(Figment::new()
        .merge(Json::file(path))
        .merge(Env::prefixed(ENV_PREFIX)))
}
