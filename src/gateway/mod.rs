// AI gateway module: mode table, upstream client and the caching query service

mod client;
pub mod models;
mod modes;
mod service;

pub use client::AzureOpenAiClient;
pub use models::{AiResponse, ChatCompletionRequest, ChatMessage, Completion, QueryOptions, TokenUsage};
pub use modes::{Mode, ModeProfile};
pub use service::AiGateway;

use crate::error::AiServiceError;
use async_trait::async_trait;

/// Something that can turn a chat-completions request into text.
///
/// The production implementation is [`AzureOpenAiClient`]; tests substitute
/// in-memory fakes.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<Completion, AiServiceError>;

    /// Whether the backend has the credentials it needs.
    fn is_configured(&self) -> bool {
        true
    }
}
