// Configuration module

mod models;

pub use models::*;

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Plain deployment variables honoured on top of everything but CLI flags.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("AZURE_OPENAI_ENDPOINT", "openai.endpoint"),
    ("AZURE_OPENAI_DEPLOYMENT_NAME", "openai.deployment"),
    ("AZURE_OPENAI_API_VERSION", "openai.api_version"),
    ("AI_CACHE_TTL_MINUTES", "cache.ttl_minutes"),
    ("PORT", "server.port"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Plain deployment variables (`AZURE_OPENAI_ENDPOINT`, `PORT`, ...)
    /// 2. Environment variables (prefix: `COUNSEL_AI__`)
    /// 3. Config file (`path`, or `~/.counsel-ai/config.toml` if present)
    /// 4. Defaults (lowest)
    ///
    /// CLI flags are applied by the caller on the returned value.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p.to_path_buf()).required(true),
            None => File::from(Self::default_config_path()).required(false),
        };

        let mut builder = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(Environment::with_prefix("COUNSEL_AI").separator("__"));

        for (var, key) in LEGACY_ENV {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let config: AppConfig = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the gateway cannot work with.
    pub fn validate(&self) -> Result<()> {
        let openai = &self.openai;
        if !(0.0..=2.0).contains(&openai.temperature) {
            return Err(AppError::Config(format!(
                "openai.temperature must be within [0, 2], got {}",
                openai.temperature
            )));
        }
        if !(openai.top_p > 0.0 && openai.top_p <= 1.0) {
            return Err(AppError::Config(format!(
                "openai.top_p must be within (0, 1], got {}",
                openai.top_p
            )));
        }
        if openai.max_tokens == 0 {
            return Err(AppError::Config("openai.max_tokens must be positive".to_string()));
        }
        if openai.timeout_seconds == 0 {
            return Err(AppError::Config("openai.timeout_seconds must be positive".to_string()));
        }
        if self.cache.capacity == 0 {
            return Err(AppError::Config("cache.capacity must be positive".to_string()));
        }
        Ok(())
    }

    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".counsel-ai")
            .join("config.toml")
    }
}

impl OpenAiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Whether an endpoint has been configured at all.
    pub fn has_endpoint(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes * 60)
    }
}
