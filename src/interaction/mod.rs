// Interaction log: advisory record of every AI exchange

use crate::gateway::Mode;
use crate::utils::logging::preview;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// One prompt/response exchange with the AI gateway.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub id: Uuid,
    pub mode: Mode,
    pub prompt: String,
    pub response: String,
    pub duration_ms: u64,
    pub cached: bool,
    pub created_at: DateTime<Utc>,
}

impl InteractionRecord {
    pub fn new(mode: Mode, prompt: &str, response: &str, duration_ms: u64, cached: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            prompt: prompt.to_string(),
            response: response.to_string(),
            duration_ms,
            cached,
            created_at: Utc::now(),
        }
    }
}

/// Sink for interaction records. Implementations must swallow their own
/// failures; logging never affects the request outcome.
pub trait InteractionLog: Send + Sync {
    fn record(&self, record: &InteractionRecord);
}

/// Emits each record as a structured event on the `interaction` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingInteractionLog;

const PREVIEW_CHARS: usize = 80;

impl InteractionLog for TracingInteractionLog {
    fn record(&self, record: &InteractionRecord) {
        info!(
            target: "interaction",
            id = %record.id,
            mode = %record.mode,
            duration_ms = record.duration_ms,
            cached = record.cached,
            prompt = %preview(&record.prompt, PREVIEW_CHARS),
            response = %preview(&record.response, PREVIEW_CHARS),
            "AI interaction logged"
        );
    }
}
