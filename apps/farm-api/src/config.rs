//! Server configuration.
//!
//! Loaded with the `config` crate from an optional TOML file, then
//! overridden by `FARM__`-prefixed environment variables:
//!
//! ```text
//! farm.toml (or $FARM_CONFIG)      FARM__SERVER__PORT=9000
//! ┌──────────────────────┐         FARM__RANKS__SILVER_MAX=800
//! │ [server]             │         FARM__AUTH__JWT_SECRET=...
//! │ port = 8080          │                    │
//! │ [ranks]              │                    │
//! │ bronze_max = 100     │                    │
//! │ silver_max = 500     │                    │
//! └──────────┬───────────┘                    │
//!            └──────────► AppConfig ◄─────────┘
//!                            │
//!                        validate()
//! ```
//!
//! Every section has development defaults, so an empty environment yields a
//! runnable server.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use farm_core::RankThresholds;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "FARM_CONFIG";

/// Config file read when `FARM_CONFIG` is unset. Missing is fine.
pub const DEFAULT_CONFIG_PATH: &str = "farm.toml";

/// Development JWT secret. Override it in every real deployment.
pub const DEV_JWT_SECRET: &str = "farm-share-dev-secret-change-in-production";

/// 72 hours.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 72 * 60 * 60;

/// Full server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ranks: RanksConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// The only storage driver this server ships.
pub const SQLITE_DRIVER: &str = "sqlite";

/// SQLite settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Storage driver. Only `sqlite` is accepted.
    pub driver: String,
    /// Database file, or `:memory:`.
    pub path: PathBuf,
    pub max_connections: u32,
    /// How long a writer waits for the database lock.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            driver: SQLITE_DRIVER.to_string(),
            path: PathBuf::from("farm.db"),
            max_connections: 5,
            busy_timeout_ms: 5_000,
        }
    }
}

/// Loyalty tier thresholds (inclusive upper bounds).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RanksConfig {
    pub bronze_max: i64,
    pub silver_max: i64,
}

impl Default for RanksConfig {
    fn default() -> Self {
        let thresholds = RankThresholds::default();
        RanksConfig {
            bronze_max: thresholds.bronze_max(),
            silver_max: thresholds.silver_max(),
        }
    }
}

/// Token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_lifetime_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_lifetime_secs: DEFAULT_TOKEN_LIFETIME_SECS,
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[serde(alias = "text")]
    Pretty,
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    File,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Required when `output = "file"`.
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            output: LogOutput::Stdout,
            file_path: None,
        }
    }
}

impl AppConfig {
    /// Loads from `$FARM_CONFIG` (or `farm.toml`) plus the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// Loads from the given TOML file (skipped if missing) plus the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("FARM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<AppConfig>()?;

        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document without consulting the environment.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize::<AppConfig>()?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the server must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rank_thresholds()?;

        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::EmptyJwtSecret);
        }

        if self.auth.token_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "auth.token_lifetime_secs must be positive".to_string(),
            ));
        }

        if !self.database.driver.eq_ignore_ascii_case(SQLITE_DRIVER) {
            return Err(ConfigError::UnsupportedDriver(self.database.driver.clone()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        if self.logging.output == LogOutput::File && self.logging.file_path.is_none() {
            return Err(ConfigError::MissingLogFile);
        }

        Ok(())
    }

    /// Validated rank thresholds.
    pub fn rank_thresholds(&self) -> Result<RankThresholds, ConfigError> {
        RankThresholds::new(self.ranks.bronze_max, self.ranks.silver_max).map_err(|_| {
            ConfigError::InvalidRankThresholds {
                bronze_max: self.ranks.bronze_max,
                silver_max: self.ranks.silver_max,
            }
        })
    }

    /// Listener address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.server.host.parse().map_err(|_| {
            ConfigError::InvalidValue(format!("server.host '{}' is not an IP address", self.server.host))
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.database.busy_timeout_ms)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid rank thresholds: bronze_max ({bronze_max}) must be below silver_max ({silver_max})")]
    InvalidRankThresholds { bronze_max: i64, silver_max: i64 },

    #[error("auth.jwt_secret must not be empty")]
    EmptyJwtSecret,

    #[error("logging.output is 'file' but logging.file_path is not set")]
    MissingLogFile,

    #[error("Unsupported database.driver '{0}': only 'sqlite' is available")]
    UnsupportedDriver(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
