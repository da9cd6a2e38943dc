// HTTP surface tests driven through the router

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{gateway, FakeBackend, RecordingLog};
use counsel_ai::cache::ResponseCache;
use counsel_ai::config::AppConfig;
use counsel_ai::error::AiServiceError;
use counsel_ai::feedback::FeedbackAnalyzer;
use counsel_ai::gateway::{AiGateway, AzureOpenAiClient};
use counsel_ai::server::create_router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    backend: Arc<FakeBackend>,
    log: Arc<RecordingLog>,
}

fn app(backend: Arc<FakeBackend>) -> TestApp {
    let log = Arc::new(RecordingLog::default());
    let gateway = Arc::new(gateway(backend.clone()));
    let analyzer = Arc::new(FeedbackAnalyzer::new(gateway.clone(), log.clone()));
    let router = create_router(AppConfig::default(), gateway, analyzer, log.clone()).unwrap();
    TestApp { router, backend, log }
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_query_success_envelope() {
    let app = app(FakeBackend::replying("Try a short walk between classes."));

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/ai/query",
        Some(json!({"prompt": "Any tips for exam stress?", "mode": "wellbeing_tips"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "AI query successful");
    assert_eq!(body["data"]["response"], "Try a short walk between classes.");
    assert_eq!(body["data"]["mode"], "wellbeing_tips");
    assert_eq!(body["data"]["cached"], false);
    assert!(body["timestamp"].is_string());
    assert_eq!(app.log.records().len(), 1);
}

#[tokio::test]
async fn test_repeat_query_reports_cached() {
    let app = app(FakeBackend::replying("ok"));
    let payload = json!({"prompt": "How do I book?", "mode": "chat"});

    send(&app.router, "POST", "/api/ai/query", Some(payload.clone())).await;
    let (_, body) = send(&app.router, "POST", "/api/ai/query", Some(payload)).await;

    assert_eq!(body["data"]["cached"], true);
    assert_eq!(app.backend.calls(), 1);
}

#[tokio::test]
async fn test_prompt_is_sanitized_before_query() {
    let app = app(FakeBackend::replying("ok"));

    send(
        &app.router,
        "POST",
        "/api/ai/query",
        Some(json!({"prompt": "  <script>hello</script>  ", "mode": "chat"})),
    )
    .await;

    let request = app.backend.last_request().unwrap();
    assert_eq!(request.messages[1].content, "scripthello/script");
}

#[tokio::test]
async fn test_query_options_are_forwarded() {
    let app = app(FakeBackend::replying("ok"));

    send(
        &app.router,
        "POST",
        "/api/ai/query",
        Some(json!({"prompt": "Suggest a counselor", "mode": "recommendation", "temperature": 0.1, "maxTokens": 64})),
    )
    .await;

    let request = app.backend.last_request().unwrap();
    assert_eq!(request.temperature, 0.1);
    assert_eq!(request.max_tokens, 64);
}

#[tokio::test]
async fn test_query_validation_errors() {
    let app = app(FakeBackend::replying("ok"));

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/ai/query",
        Some(json!({"prompt": "hi", "mode": "poetry"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["message"], "Validation failed");
    let details = body["error"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0]["field"], "prompt");
    assert_eq!(details[1]["field"], "mode");
    assert_eq!(app.backend.calls(), 0);
}

#[tokio::test]
async fn test_analysis_mode_is_not_public() {
    let app = app(FakeBackend::replying("ok"));

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/ai/query",
        Some(json!({"prompt": "Rate this session", "mode": "analyzeFeedback"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "mode");
    assert_eq!(app.backend.calls(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app(FakeBackend::replying("ok"));

    let request = Request::builder()
        .method("POST")
        .uri("/api/ai/query")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["kind"], "invalid_request");
}

#[tokio::test]
async fn test_rate_limited_query_is_429() {
    let app = app(FakeBackend::failing(AiServiceError::RateLimited));

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/ai/query",
        Some(json!({"prompt": "How do I book?", "mode": "chat"})),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["kind"], "rate_limited");
    assert!(app.log.records().is_empty());
}

#[tokio::test]
async fn test_unavailable_query_is_503() {
    let app = app(FakeBackend::failing(AiServiceError::ServiceUnavailable(
        "HTTP 500: internal".to_string(),
    )));

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/ai/query",
        Some(json!({"prompt": "How do I book?", "mode": "chat"})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["message"], "AI service temporarily unavailable");
}

#[tokio::test]
async fn test_cache_stats_and_clear() {
    let app = app(FakeBackend::replying("ok"));
    send(
        &app.router,
        "POST",
        "/api/ai/query",
        Some(json!({"prompt": "How do I book?", "mode": "chat"})),
    )
    .await;

    let (status, body) = send(&app.router, "GET", "/api/ai/cache/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cache"]["size"], 1);
    assert_eq!(body["data"]["cache"]["capacity"], 100);
    assert_eq!(body["data"]["cache"]["ttl"], 600);

    let (status, body) = send(&app.router, "DELETE", "/api/ai/cache", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "AI cache cleared");

    let (_, body) = send(&app.router, "GET", "/api/ai/cache/stats", None).await;
    assert_eq!(body["data"]["cache"]["size"], 0);
}

#[tokio::test]
async fn test_feedback_analyze_created() {
    let app = app(FakeBackend::replying(
        r#"{"rating": 5, "sentiment": "positive", "summary": "Very helpful session."}"#,
    ));

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/feedback/analyze",
        Some(json!({"feedback": "The counselor really listened to me."})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Feedback analyzed successfully");
    let analysis = &body["data"]["analysis"];
    assert_eq!(analysis["rating"], 5);
    assert_eq!(analysis["sentiment"], "positive");
    assert_eq!(analysis["summary"], "Very helpful session.");
    assert_eq!(analysis["improvementSuggestions"], Value::Null);
    assert_eq!(analysis["aiAnalyzed"], true);
}

#[tokio::test]
async fn test_feedback_analyze_fallback_still_created() {
    let app = app(FakeBackend::failing(AiServiceError::Timeout));

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/feedback/analyze",
        Some(json!({"feedback": "Session was fine, nothing special."})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Feedback received, default analysis applied");
    assert_eq!(body["data"]["analysis"]["rating"], 3);
    assert_eq!(body["data"]["analysis"]["sentiment"], "neutral");
    assert_eq!(body["data"]["analysis"]["aiAnalyzed"], false);
}

#[tokio::test]
async fn test_short_feedback_rejected() {
    let app = app(FakeBackend::replying("ok"));

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/feedback/analyze",
        Some(json!({"feedback": "   good   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "feedback");
    assert_eq!(app.backend.calls(), 0);
}

#[tokio::test]
async fn test_health_reports_healthy_with_backend() {
    let app = app(FakeBackend::replying("ok"));

    let (status, body) = send(&app.router, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["ai_service"]["status"], "ok");
    assert_eq!(body["checks"]["ai_cache"]["message"], "0/100 entries");
}

#[tokio::test]
async fn test_health_reports_degraded_without_key() {
    let config = AppConfig::default();
    let client = AzureOpenAiClient::new(&config.openai, None).unwrap();
    let gateway = Arc::new(AiGateway::new(
        Arc::new(client),
        Arc::new(ResponseCache::from_config(&config.cache)),
        &config.openai,
    ));
    let log = Arc::new(RecordingLog::default());
    let analyzer = Arc::new(FeedbackAnalyzer::new(gateway.clone(), log.clone()));
    let router = create_router(config, gateway, analyzer, log).unwrap();

    let (status, body) = send(&router, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["ai_service"]["message"], "AI service not configured");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = app(FakeBackend::replying("ok"));

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
