use crate::core::{AppError, Result};
use crate::modules::invoices::services::DEFAULT_LOOKAHEAD_DAYS;
use crate::storage::StorageBackend;
use chrono::NaiveTime;
use std::env;
use std::str::FromStr;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageBackend,
    /// Only present for the MySQL backend
    pub database: Option<DatabaseConfig>,
    pub server: ServerConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

/// Daily invoice job settings
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    /// Wall-clock time (UTC) of the daily run
    pub run_at: NaiveTime,
    pub run_on_startup: bool,
    /// How many days ahead of a due date the next invoice may be issued
    pub lookahead_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            run_at: NaiveTime::MIN,
            run_on_startup: true,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let storage: StorageBackend = env_or("STORAGE_BACKEND", StorageBackend::MySql)?;
        let database = match storage {
            StorageBackend::MySql => Some(DatabaseConfig::from_env()?),
            StorageBackend::Memory => None,
        };

        let defaults = SchedulerConfig::default();
        let run_at = match env::var("SCHEDULER_RUN_AT") {
            Ok(value) => parse_run_at(&value)?,
            Err(_) => defaults.run_at,
        };

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),
                log_format: env_or("LOG_FORMAT", LogFormat::Pretty)?,
            },
            storage,
            database,
            server: ServerConfig::from_env()?,
            scheduler: SchedulerConfig {
                enabled: env_or("SCHEDULER_ENABLED", defaults.enabled)?,
                run_at,
                run_on_startup: env_or("SCHEDULER_RUN_ON_STARTUP", defaults.run_on_startup)?,
                lookahead_days: env_or("INVOICE_LOOKAHEAD_DAYS", defaults.lookahead_days)?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(database) = &self.database {
            database.validate()?;
        }

        if self.scheduler.lookahead_days == 0 {
            return Err(AppError::Configuration(
                "INVOICE_LOOKAHEAD_DAYS must be greater than 0".to_string(),
            ));
        }

        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "SERVER_WORKERS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Read `key` from the environment, falling back to `default` when unset
pub(crate) fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}: '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}

/// Parse an `HH:MM` run time
pub fn parse_run_at(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        AppError::Configuration(format!(
            "Invalid SCHEDULER_RUN_AT '{}', expected HH:MM",
            value
        ))
    })
}
