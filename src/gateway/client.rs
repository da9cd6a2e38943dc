// Azure OpenAI chat-completions client

use super::models::{ChatCompletionRequest, ChatCompletionResponse, Completion};
use super::CompletionBackend;
use crate::config::OpenAiConfig;
use crate::error::{AiServiceError, Result};
use crate::utils::logging::{preview, sanitize};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

/// Client for an Azure OpenAI chat-completions deployment.
///
/// The API key is optional: without one (or without an endpoint) the client
/// reports itself as unconfigured and refuses every call before touching the
/// network.
pub struct AzureOpenAiClient {
    http_client: Client,
    url: String,
    api_key: Option<Zeroizing<String>>,
}

impl AzureOpenAiClient {
    /// Create a client for the configured deployment.
    ///
    /// The overall request deadline is owned by the gateway; the HTTP client
    /// only bounds connection setup and keeps a generous read timeout.
    pub fn new(config: &OpenAiConfig, api_key: Option<Zeroizing<String>>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout() + Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls()
            .build()?;

        let api_key = api_key.filter(|k| !k.trim().is_empty());
        let url = Self::completions_url(config);

        if api_key.is_none() {
            warn!("Azure OpenAI API key not configured, AI features disabled");
        } else if !config.has_endpoint() {
            warn!("Azure OpenAI endpoint not configured, AI features disabled");
        } else {
            info!(deployment = %config.deployment, "Azure OpenAI client initialized");
        }

        Ok(Self {
            http_client,
            url,
            api_key: if config.has_endpoint() { api_key } else { None },
        })
    }

    /// `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={version}`
    pub fn completions_url(config: &OpenAiConfig) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            config.endpoint.trim().trim_end_matches('/'),
            urlencoding::encode(&config.deployment),
            urlencoding::encode(&config.api_version),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Map a non-success HTTP status onto the gateway error taxonomy.
    pub fn classify_status(status: StatusCode) -> AiServiceError {
        match status.as_u16() {
            401 => AiServiceError::AuthenticationFailed,
            429 => AiServiceError::RateLimited,
            code => AiServiceError::ServiceUnavailable(format!("upstream returned HTTP {}", code)),
        }
    }

    fn classify_transport(e: &reqwest::Error) -> AiServiceError {
        if e.is_timeout() {
            AiServiceError::Timeout
        } else {
            AiServiceError::ServiceUnavailable(format!("HTTP error: {}", e))
        }
    }
}

#[async_trait]
impl CompletionBackend for AzureOpenAiClient {
    async fn complete(&self, request: &ChatCompletionRequest) -> std::result::Result<Completion, AiServiceError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            error!("Azure OpenAI API key not available");
            AiServiceError::ServiceUnavailable("AI service not configured".to_string())
        })?;

        debug!(max_tokens = request.max_tokens, "Calling chat completions");

        let response = self
            .http_client
            .post(&self.url)
            .header("api-key", api_key.as_str())
            .json(request)
            .send()
            .await
            .map_err(|e| Self::classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                status = status.as_u16(),
                body = %preview(&sanitize(&error_text), 200),
                "Chat completions request failed"
            );
            return Err(Self::classify_status(status));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| Self::classify_transport(&e))?;

        let parsed: ChatCompletionResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse chat completions response: {}", e);
            AiServiceError::ServiceUnavailable(format!("Response parsing error: {}", e))
        })?;

        parsed.into_completion().ok_or_else(|| {
            error!("Chat completions response had no message content");
            AiServiceError::ServiceUnavailable("Response contained no completion".to_string())
        })
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
