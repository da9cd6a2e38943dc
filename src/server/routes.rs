// HTTP routes configuration

use super::handlers::{
    ai_query_handler, analyze_feedback_handler, cache_stats_handler, clear_cache_handler,
    health_handler,
};
use super::middleware::{cors_layer, request_id_layers};
use crate::config::AppConfig;
use crate::error::Result;
use crate::feedback::FeedbackAnalyzer;
use crate::gateway::AiGateway;
use crate::interaction::InteractionLog;
use axum::{routing::{delete, get, post}, Router};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub gateway: Arc<AiGateway>,
    pub analyzer: Arc<FeedbackAnalyzer>,
    pub interaction_log: Arc<dyn InteractionLog>,
}

pub fn create_router(
    config: AppConfig,
    gateway: Arc<AiGateway>,
    analyzer: Arc<FeedbackAnalyzer>,
    interaction_log: Arc<dyn InteractionLog>,
) -> Result<Router> {
    let cors = cors_layer(&config.server.cors_origin)?;
    let body_limit = config.server.body_limit_bytes;

    let state = AppState {
        config,
        gateway,
        analyzer,
        interaction_log,
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/ai/query", post(ai_query_handler))
        .route("/api/ai/cache/stats", get(cache_stats_handler))
        .route("/api/ai/cache", delete(clear_cache_handler))
        .route("/api/feedback/analyze", post(analyze_feedback_handler))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
