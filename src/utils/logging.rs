//! Structured logging and security-focused trace utilities.
//!
//! This module configures the `tracing` ecosystem for the application and
//! provides helpers to prevent API keys and full user prompts from leaking
//! into logs.

use crate::config::LoggingConfig;
use crate::error::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports two output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

/// Sanitizes credentials from a string before it is logged.
///
/// Replaces the value following an `api-key` marker (header or JSON field)
/// and any `Bearer` token with a `\[REDACTED\]` placeholder.
pub fn sanitize(input: &str) -> String {
    let mut result = input.to_string();

    for marker in ["api-key", "Bearer "] {
        let mut search_from = 0;
        while let Some(found) = result[search_from..].find(marker) {
            let marker_end = search_from + found + marker.len();
            // Skip separators between the marker and the value: `: "`, `=`, spaces
            let start = result[marker_end..]
                .find(|c: char| !matches!(c, ':' | '=' | '"' | '\'' | ' '))
                .map_or(result.len(), |i| marker_end + i);
            let end = result[start..]
                .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == ',')
                .map_or(result.len(), |i| start + i);

            // Both offsets come from `find`, so they sit on char boundaries
            search_from = if end > start {
                result.replace_range(start..end, "[REDACTED]");
                start + "[REDACTED]".len()
            } else {
                start
            };
        }
    }

    result
}

/// Truncate text to at most `max_chars` characters for log fields.
pub fn preview(input: &str, max_chars: usize) -> String {
    let mut chars = input.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
