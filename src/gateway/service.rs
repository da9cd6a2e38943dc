// AI gateway: cached, mode-aware queries against a completion backend

use super::models::{AiResponse, ChatCompletionRequest, ChatMessage, QueryOptions};
use super::{CompletionBackend, Mode};
use crate::cache::{CacheStats, ResponseCache};
use crate::config::OpenAiConfig;
use crate::error::AiServiceError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Translates `(prompt, mode)` pairs into model output, caching identical
/// requests.
///
/// Concurrent misses for the same key are not coalesced: each issues its own
/// upstream call and the last one to finish owns the cache slot.
pub struct AiGateway {
    backend: Arc<dyn CompletionBackend>,
    cache: Arc<ResponseCache>,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
    timeout: Duration,
}

impl AiGateway {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        cache: Arc<ResponseCache>,
        config: &OpenAiConfig,
    ) -> Self {
        Self {
            backend,
            cache,
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
        }
    }

    /// Query with a mode given by name. Unknown modes fail with `InvalidInput`.
    pub async fn query(
        &self,
        prompt: &str,
        mode: &str,
        options: QueryOptions,
    ) -> Result<AiResponse, AiServiceError> {
        let mode: Mode = mode.parse()?;
        self.query_mode(prompt, mode, options).await
    }

    /// Query with an already parsed mode.
    pub async fn query_mode(
        &self,
        prompt: &str,
        mode: Mode,
        options: QueryOptions,
    ) -> Result<AiResponse, AiServiceError> {
        if prompt.trim().is_empty() {
            return Err(AiServiceError::InvalidInput("Invalid prompt".to_string()));
        }

        let cache_key = ResponseCache::key(mode, prompt);
        if let Some(text) = self.cache.get(&cache_key) {
            debug!(%mode, prompt_length = prompt.len(), "AI cache hit");
            return Ok(AiResponse {
                text,
                mode,
                cached: true,
                token_usage: None,
            });
        }

        let request = self.build_request(prompt, mode, options);
        let start = Instant::now();

        let outcome = match tokio::time::timeout(self.timeout, self.backend.complete(&request)).await {
            Ok(result) => result,
            Err(_) => Err(AiServiceError::Timeout),
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(completion) => {
                // Blank output is returned but never cached, so a retry asks again
                if !completion.text.trim().is_empty() {
                    self.cache.insert(cache_key, completion.text.clone());
                }

                info!(
                    %mode,
                    duration_ms,
                    prompt_length = prompt.len(),
                    response_length = completion.text.len(),
                    tokens = completion.usage.map(|u| u.total_tokens),
                    "AI request completed"
                );

                Ok(AiResponse {
                    text: completion.text,
                    mode,
                    cached: false,
                    token_usage: completion.usage,
                })
            }
            Err(e) => {
                error!(%mode, duration_ms, kind = e.kind(), error = %e, "AI request failed");
                Err(e)
            }
        }
    }

    /// Assemble the upstream request for a mode, applying overrides on top of
    /// the mode profile and the configured defaults.
    pub fn build_request(&self, prompt: &str, mode: Mode, options: QueryOptions) -> ChatCompletionRequest {
        let profile = mode.profile();
        let max_tokens = options
            .max_tokens
            .or(profile.default_max_tokens)
            .unwrap_or(self.max_tokens);

        ChatCompletionRequest {
            messages: vec![
                ChatMessage::system(profile.system_prompt),
                ChatMessage::user(prompt),
            ],
            max_tokens,
            temperature: options.temperature.unwrap_or(self.temperature),
            top_p: self.top_p,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }

    /// Drop every cached response.
    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("AI cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_configured()
    }
}
