// HTTP middleware

use crate::error::{AppError, Result};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Create request ID layers for the application
pub fn request_id_layers() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    (
        SetRequestIdLayer::x_request_id(MakeRequestUuid),
        PropagateRequestIdLayer::x_request_id(),
    )
}

/// CORS for the configured origin; `*` allows any origin.
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    if origin.trim() == "*" {
        return Ok(layer.allow_origin(Any));
    }

    let origin = HeaderValue::from_str(origin.trim())
        .map_err(|e| AppError::Config(format!("Invalid CORS origin '{}': {}", origin, e)))?;
    Ok(layer.allow_origin(origin))
}
