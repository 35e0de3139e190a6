//! OpenAI-compatible legacy completions provider

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{CompletionRequest, CompletionService};
use crate::config::CompletionConfig;
use crate::{Error, Result};

/// Client for `POST {api_base}/completions`
pub struct OpenAiCompletion {
    client: Client,
    endpoint: String,
    api_key: SecretString,
}

impl OpenAiCompletion {
    /// Create a client from completion configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no API key is configured, or `Error::Http`
    /// if the HTTP client cannot be built
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Self::with_client(client, config)
    }

    /// Create a provider around an existing HTTP client
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no API key is configured
    pub fn with_client(client: Client, config: &CompletionConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .map(|key| SecretString::from(key.expose_secret().to_string()))
            .ok_or_else(|| {
                Error::Config("no API key configured (set OPENAI_API_KEY)".to_string())
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/completions", config.api_base.trim_end_matches('/')),
            api_key,
        })
    }

    /// Endpoint URL requests are sent to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = CompletionBody {
            model: &request.model,
            prompt: &request.prompt,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Service(format!("completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Service(describe_failure(status, &detail)));
        }

        let result: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Service(format!("failed to parse completion response: {e}")))?;

        let text = result
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text.trim().to_string())
            .ok_or_else(|| Error::Service("completion response had no choices".to_string()))?;

        tracing::debug!(model = %request.model, chars = text.len(), "completion received");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

fn describe_failure(status: StatusCode, detail: &str) -> String {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("authentication failed ({status}): {detail}")
        }
        StatusCode::TOO_MANY_REQUESTS => format!("rate limited ({status}): {detail}"),
        _ => format!("API error ({status}): {detail}"),
    }
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    text: String,
}
