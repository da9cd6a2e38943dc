// HTTP request handlers

use super::routes::AppState;
use crate::error::{AppError, FieldError};
use crate::feedback::FeedbackAnalysis;
use crate::gateway::{Mode, QueryOptions};
use crate::interaction::InteractionRecord;
use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{error, info};

const MIN_PROMPT_CHARS: usize = 3;
const MAX_PROMPT_CHARS: usize = 1000;
const MIN_FEEDBACK_CHARS: usize = 10;

/// Wrap `data` in the success envelope.
fn success<T: Serialize>(status: StatusCode, data: T, message: &str) -> Response {
    let body = json!({
        "success": true,
        "data": data,
        "message": message,
        "timestamp": crate::utils::timestamp(),
    });
    (status, Json(body)).into_response()
}

// Deserialize by hand so malformed bodies get the error envelope
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, AppError> {
    serde_json::from_str(body).map_err(|e| {
        error!("Failed to deserialize request: {}", e);
        AppError::InvalidRequest(format!("JSON deserialization error: {}", e))
    })
}

/// Trim, drop angle brackets and cap the length of a user prompt.
pub fn sanitize_prompt(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .take(MAX_PROMPT_CHARS)
        .collect()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    let ai_check = if state.gateway.is_configured() {
        HealthCheck {
            status: "ok".to_string(),
            message: format!("Deployment: {}", state.config.openai.deployment),
        }
    } else {
        overall_status = HealthStatus::Degraded;
        HealthCheck {
            status: "warning".to_string(),
            message: "AI service not configured".to_string(),
        }
    };
    checks.insert("ai_service".to_string(), ai_check);

    let stats = state.gateway.cache_stats();
    checks.insert(
        "ai_cache".to_string(),
        HealthCheck {
            status: "ok".to_string(),
            message: format!("{}/{} entries", stats.size, stats.capacity),
        },
    );

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: crate::utils::timestamp(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiQueryRequest {
    prompt: Option<String>,
    mode: Option<String>,
    #[serde(flatten)]
    options: QueryOptions,
}

/// Handler for POST /api/ai/query
pub async fn ai_query_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Response, AppError> {
    let req: AiQueryRequest = parse_body(&body)?;

    let mut errors = Vec::new();
    let prompt = req
        .prompt
        .as_deref()
        .filter(|p| p.trim().chars().count() >= MIN_PROMPT_CHARS);
    if prompt.is_none() {
        errors.push(FieldError::new("prompt", "Prompt must be at least 3 characters"));
    }

    let mode = req
        .mode
        .as_deref()
        .and_then(|m| m.parse::<Mode>().ok())
        .filter(|m| m.is_public());
    if mode.is_none() {
        let public: Vec<&str> = Mode::ALL
            .iter()
            .filter(|m| m.is_public())
            .map(|m| m.as_str())
            .collect();
        errors.push(FieldError::new(
            "mode",
            &format!("Invalid mode. Must be one of: {}", public.join(", ")),
        ));
    }

    let (Some(prompt), Some(mode)) = (prompt, mode) else {
        return Err(AppError::Validation(errors));
    };

    let prompt = sanitize_prompt(prompt);
    let start = Instant::now();

    let result = state
        .gateway
        .query_mode(&prompt, mode, req.options)
        .await
        .map_err(|e| {
            error!(%mode, kind = e.kind(), "AI query failed");
            AppError::Ai(e)
        })?;

    let duration_ms = start.elapsed().as_millis() as u64;
    state.interaction_log.record(&InteractionRecord::new(
        mode,
        &prompt,
        &result.text,
        duration_ms,
        result.cached,
    ));

    info!(%mode, duration_ms, cached = result.cached, "AI query processed");

    Ok(success(
        StatusCode::OK,
        json!({
            "response": result.text,
            "mode": result.mode,
            "cached": result.cached,
        }),
        "AI query successful",
    ))
}

/// Handler for GET /api/ai/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Response {
    let stats = state.gateway.cache_stats();
    success(StatusCode::OK, json!({ "cache": stats }), "Cache statistics retrieved")
}

/// Handler for DELETE /api/ai/cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Response {
    state.gateway.clear_cache();
    success(StatusCode::OK, serde_json::Value::Null, "AI cache cleared")
}

#[derive(Debug, Deserialize)]
struct FeedbackRequest {
    feedback: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisBody<'a> {
    #[serde(flatten)]
    analysis: &'a FeedbackAnalysis,
    ai_analyzed: bool,
}

/// Handler for POST /api/feedback/analyze
pub async fn analyze_feedback_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Response, AppError> {
    let req: FeedbackRequest = parse_body(&body)?;

    let feedback = req
        .feedback
        .as_deref()
        .map(str::trim)
        .filter(|f| f.chars().count() >= MIN_FEEDBACK_CHARS)
        .ok_or_else(|| {
            AppError::Validation(vec![FieldError::new(
                "feedback",
                "Feedback must be at least 10 characters",
            )])
        })?;

    let outcome = state.analyzer.analyze_detailed(feedback).await;

    info!(
        rating = outcome.analysis.rating,
        ai_analyzed = outcome.ai_analyzed,
        "Feedback analysis returned"
    );

    let message = if outcome.ai_analyzed {
        "Feedback analyzed successfully"
    } else {
        "Feedback received, default analysis applied"
    };

    let analysis = AnalysisBody {
        analysis: &outcome.analysis,
        ai_analyzed: outcome.ai_analyzed,
    };

    Ok(success(StatusCode::CREATED, json!({ "analysis": analysis }), message))
}
