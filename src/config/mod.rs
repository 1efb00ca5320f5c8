use crate::error::{Result, RosterError};
use dashmap::DashMap;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use strum_macros::{AsRefStr, Display, EnumString};

pub mod tracing;

pub use self::tracing::init_tracing;

pub const ENV_PREFIX: &str = "ROSTER_";

/// Raw key/value settings, usually read from `ROSTER_*` environment variables.
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let service = Self::default();
        for (key, value) in env::vars().filter(|(key, _)| key.starts_with(ENV_PREFIX)) {
            service.set(&key, &value);
        }
        service
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Parses `key` if present. A present but unparsable value is an error.
    pub fn parse<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|e| RosterError::Config(format!("{key}={raw:?}: {e}")))
            })
            .transpose()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Typed application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    /// Sample users inserted at startup into an empty store.
    pub seed_users: usize,
    pub init_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_format: LogFormat::Pretty,
            seed_users: 0,
            init_timeout: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    pub fn from_service(config: &ConfigService) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: config.get("ROSTER_HOST").unwrap_or(defaults.host),
            port: config.parse("ROSTER_PORT")?.unwrap_or(defaults.port),
            log_format: config
                .parse("ROSTER_LOG_FORMAT")?
                .unwrap_or(defaults.log_format),
            seed_users: config
                .parse("ROSTER_SEED_USERS")?
                .unwrap_or(defaults.seed_users),
            init_timeout: config
                .parse::<u64>("ROSTER_INIT_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.init_timeout),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_service(&ConfigService::from_env())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
