//! Axum-based HTTP server for counsel-ai.
//!
//! Exposes the AI gateway and the feedback analyzer behind the JSON
//! envelopes used by the scheduler frontend:
//! `{success, data, message, timestamp}` on success and
//! `{success: false, error: {message, code, ...}, timestamp}` on failure.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual API endpoints.
//! - `middleware`: Request ID, CORS and body limit layers.
//! - `routes`: The router configuration that ties everything together.

mod handlers;
mod middleware;
mod routes;

pub use handlers::sanitize_prompt;
pub use routes::{create_router, AppState};
