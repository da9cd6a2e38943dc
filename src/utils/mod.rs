//! Utility functions and helpers for counsel-ai.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization plus redaction and preview helpers
//!   that keep secrets and full prompts out of log sinks.

pub mod logging;

use chrono::{SecondsFormat, Utc};

/// Current UTC time as an RFC 3339 string with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
