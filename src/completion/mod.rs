//! Text-completion service boundary
//!
//! Provides a provider-based abstraction over generative completion APIs

mod openai;

pub use openai::OpenAiCompletion;

use async_trait::async_trait;
use serde::Serialize;

use crate::Result;

/// A single completion call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Full prompt text
    pub prompt: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum output tokens
    pub max_tokens: u32,
}

/// Trait for text-completion providers
///
/// Implementations do not retry; failures are returned to the caller as
/// `Error::Service`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Complete a prompt and return the generated text
    ///
    /// # Errors
    ///
    /// Returns error on network, authentication or rate-limit failures
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
