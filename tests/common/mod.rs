// Shared test fixtures: in-memory completion backend and interaction recorder
#![allow(dead_code)]

use async_trait::async_trait;
use counsel_ai::cache::ResponseCache;
use counsel_ai::config::OpenAiConfig;
use counsel_ai::error::AiServiceError;
use counsel_ai::gateway::{AiGateway, ChatCompletionRequest, Completion, CompletionBackend, TokenUsage};
use counsel_ai::interaction::{InteractionLog, InteractionRecord};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Backend returning a fixed reply and counting calls.
pub struct FakeBackend {
    reply: Mutex<Result<String, AiServiceError>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatCompletionRequest>>,
}

impl FakeBackend {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self::new(Ok(text.to_string()), None))
    }

    pub fn failing(error: AiServiceError) -> Arc<Self> {
        Arc::new(Self::new(Err(error), None))
    }

    pub fn slow(text: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self::new(Ok(text.to_string()), Some(delay)))
    }

    fn new(reply: Result<String, AiServiceError>, delay: Option<Duration>) -> Self {
        Self {
            reply: Mutex::new(reply),
            delay,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn set_reply(&self, text: &str) {
        *self.reply.lock() = Ok(text.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatCompletionRequest> {
        self.last_request.lock().clone()
    }
}

#[async_trait]
impl CompletionBackend for FakeBackend {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<Completion, AiServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.reply.lock().clone();
        reply.map(|text| Completion {
            text,
            usage: Some(TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        })
    }
}

pub fn gateway_with(backend: Arc<FakeBackend>, capacity: usize, ttl: Duration) -> AiGateway {
    AiGateway::new(
        backend,
        Arc::new(ResponseCache::new(capacity, ttl)),
        &OpenAiConfig::default(),
    )
}

pub fn gateway(backend: Arc<FakeBackend>) -> AiGateway {
    gateway_with(backend, 100, Duration::from_secs(600))
}

/// Interaction log that keeps every record in memory.
#[derive(Default)]
pub struct RecordingLog {
    records: Mutex<Vec<InteractionRecord>>,
}

impl RecordingLog {
    pub fn records(&self) -> Vec<InteractionRecord> {
        self.records.lock().clone()
    }
}

impl InteractionLog for RecordingLog {
    fn record(&self, record: &InteractionRecord) {
        self.records.lock().push(record.clone());
    }
}
