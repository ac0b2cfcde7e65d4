use std::net::IpAddr;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::fees::DEFAULT_MAX_CONCURRENT_LOOKUPS;

/// Public mainnet gateway used when no upstream is configured.
pub const DEFAULT_RPC_URL: &str = "https://bitcoin-mainnet.public.blastapi.io";

/// Environment variable naming the upstream node.
pub const RPC_URL_ENV: &str = "BLAST_RPC_URL";

/// Prefix for every other environment override, e.g. `TIMECHAIN__API__PORT`.
pub const ENV_PREFIX: &str = "TIMECHAIN";

const DEFAULT_CONFIG_FILE: &str = "timechain.toml";
const DOTENV_FILE: &str = "variables.env";

#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ConfigValidationError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    pub api: ApiConfig,
    pub rpc: RpcConfig,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Bind address for the HTTP server
    pub bind_address: String,
    pub port: u16,
    /// Client request timeout in seconds
    pub request_timeout: u64,
    /// CORS allowed origins, `*` for any
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcConfig {
    /// JSON-RPC endpoint of the upstream node
    pub url: String,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
    /// Prior-transaction lookups allowed in flight per request
    pub max_concurrent_lookups: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            rpc: RpcConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout: 30,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            timeout_secs: 30,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }
}

impl RpcConfig {
    /// Scheme, host and port only; hosted gateways put access keys in the path.
    pub fn redacted_url(&self) -> String {
        match reqwest::Url::parse(&self.url) {
            Ok(url) => match (url.host_str(), url.port()) {
                (Some(host), Some(port)) => format!("{}://{}:{}", url.scheme(), host, port),
                (Some(host), None) => format!("{}://{}", url.scheme(), host),
                _ => "<invalid url>".to_string(),
            },
            Err(_) => "<invalid url>".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration.
    ///
    /// Sources in increasing priority: defaults, the TOML file (`path` or
    /// `timechain.toml` if present), `TIMECHAIN__*` variables, then
    /// `BLAST_RPC_URL`. `variables.env` is read into the environment first.
    pub fn load(path: Option<&Path>) -> Result<Self, LoadError> {
        if dotenv::from_filename(DOTENV_FILE).is_ok() {
            info!("Loaded environment from {}", DOTENV_FILE);
        }
        let rpc_url = std::env::var(RPC_URL_ENV).ok();
        Self::load_layered(path, rpc_url)
    }

    /// Same layering as [`ServiceConfig::load`] with the upstream URL
    /// override passed in rather than read from the environment.
    pub fn load_layered(path: Option<&Path>, rpc_url: Option<String>) -> Result<Self, LoadError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        match path {
            Some(path) => {
                info!("Loading configuration from: {:?}", path);
                builder = builder.add_source(File::from(path.to_path_buf()).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    info!("Loading configuration from: {:?}", default_path);
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }

        builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("rpc.url", rpc_url)?;

        let config: ServiceConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.api.port == 0 {
            return Err(ConfigValidationError::InvalidPort(
                "API port must be non-zero".to_string(),
            ));
        }
        self.api
            .bind_address
            .parse::<IpAddr>()
            .map_err(|e| ConfigValidationError::InvalidBindAddress(format!("{}: {e}", self.api.bind_address)))?;
        if self.api.request_timeout == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "api.request_timeout must be greater than 0".to_string(),
            ));
        }

        let url = reqwest::Url::parse(&self.rpc.url)
            .map_err(|e| ConfigValidationError::InvalidRpcUrl(format!("{}: {e}", self.rpc.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigValidationError::InvalidRpcUrl(format!(
                "unsupported scheme `{}`",
                url.scheme()
            )));
        }
        if self.rpc.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "rpc.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.rpc.max_concurrent_lookups == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "rpc.max_concurrent_lookups must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
