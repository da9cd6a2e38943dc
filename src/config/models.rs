//! Configuration data structures for counsel-ai.
//!
//! This module defines the schema for the application settings: the HTTP
//! listener, the upstream chat-completions deployment, the response cache,
//! secret lookup and logging.

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, CORS).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream chat-completions deployment and default sampling parameters.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// AI response cache sizing.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Where to look for the API credential.
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8080`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origin. `*` allows any origin.
    /// Default: `*`
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Maximum accepted request body in bytes.
    /// Default: `65536`
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

/// Settings for the Azure OpenAI chat-completions deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    /// Empty means AI features are disabled.
    #[serde(default)]
    pub endpoint: String,

    /// Deployment (model) identifier.
    /// Default: `gpt-4`
    #[serde(default = "default_deployment")]
    pub deployment: String,

    /// Value of the `api-version` query parameter.
    /// Default: `2023-05-15`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Upper bound on a single upstream call, in seconds.
    /// Default: `30`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Default sampling temperature.
    /// Default: `0.7`
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Default nucleus sampling mass.
    /// Default: `0.95`
    #[serde(default = "default_top_p")]
    pub top_p: f64,

    /// Default output budget for modes without their own.
    /// Default: `500`
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// Settings for the AI response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached responses.
    /// Default: `100`
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Time-to-live of a cached response, in minutes.
    /// Default: `10`
    #[serde(default = "default_cache_ttl")]
    pub ttl_minutes: u64,
}

/// Settings for credential lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Optional JSON secrets file consulted before the environment.
    #[serde(default)]
    pub store_path: Option<String>,

    /// Name of the API key inside the secret store.
    /// Default: `AZURE-OPENAI-API-KEY`
    #[serde(default = "default_api_key_name")]
    pub api_key_name: String,

    /// Environment variable used when the store has no API key.
    /// Default: `AZURE_OPENAI_API_KEY`
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            deployment: default_deployment(),
            api_version: default_api_version(),
            timeout_seconds: default_timeout(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_minutes: default_cache_ttl(),
        }
    }
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            api_key_name: default_api_key_name(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

fn default_body_limit() -> usize {
    64 * 1024
}

fn default_deployment() -> String {
    "gpt-4".to_string()
}

fn default_api_version() -> String {
    "2023-05-15".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    0.95
}

fn default_max_tokens() -> u32 {
    500
}

fn default_cache_capacity() -> usize {
    100
}

fn default_cache_ttl() -> u64 {
    10
}

fn default_api_key_name() -> String {
    "AZURE-OPENAI-API-KEY".to_string()
}

fn default_api_key_env() -> String {
    "AZURE_OPENAI_API_KEY".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
