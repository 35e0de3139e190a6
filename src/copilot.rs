//! Question answering over the knowledge base
//!
//! Pairs an immutable [`KnowledgeStore`] with a [`CompletionService`] and asks
//! each question twice: once with the bare question and once grounded in the
//! retrieved context, so the two answers can be compared.

use std::sync::Arc;

use serde::Serialize;

use crate::Result;
use crate::completion::{CompletionRequest, CompletionService};
use crate::config::{CompletionConfig, Config, RetrievalConfig};
use crate::knowledge::{ContextRetriever, KnowledgeStore};
use crate::prompt::{PromptKind, basic_prompt, grounded_prompt};

/// Model and retrieval parameters used for every question
#[derive(Debug, Clone, PartialEq)]
pub struct CopilotSettings {
    pub model: String,
    pub max_tokens: u32,
    pub basic_temperature: f32,
    pub grounded_temperature: f32,
    pub top_k: usize,
    pub seed: u64,
}

impl Default for CopilotSettings {
    fn default() -> Self {
        let completion = CompletionConfig::default();
        let retrieval = RetrievalConfig::default();
        Self {
            model: completion.model,
            max_tokens: completion.max_tokens,
            basic_temperature: completion.basic_temperature,
            grounded_temperature: completion.grounded_temperature,
            top_k: retrieval.top_k,
            seed: retrieval.seed,
        }
    }
}

impl From<&Config> for CopilotSettings {
    fn from(config: &Config) -> Self {
        Self {
            model: config.completion.model.clone(),
            max_tokens: config.completion.max_tokens,
            basic_temperature: config.completion.basic_temperature,
            grounded_temperature: config.completion.grounded_temperature,
            top_k: config.retrieval.top_k,
            seed: config.retrieval.seed,
        }
    }
}

/// Side-by-side answers for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub question: String,
    pub context: String,
    pub basic_answer: String,
    pub grounded_answer: String,
}

/// Retrieval-grounded question answering
pub struct Copilot {
    store: KnowledgeStore,
    service: Arc<dyn CompletionService>,
    settings: CopilotSettings,
}

impl Copilot {
    #[must_use]
    pub fn new(
        store: KnowledgeStore,
        service: Arc<dyn CompletionService>,
        settings: CopilotSettings,
    ) -> Self {
        Self {
            store,
            service,
            settings,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    #[must_use]
    pub const fn settings(&self) -> &CopilotSettings {
        &self.settings
    }

    /// Build the context block for a question with the configured `top_k`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the configured `top_k` is zero
    pub fn context(&self, question: &str) -> Result<String> {
        ContextRetriever::new(&self.store).retrieve(
            question,
            self.settings.top_k,
            self.settings.seed,
        )
    }

    /// Answer from the model alone, without retrieved context
    ///
    /// # Errors
    ///
    /// Returns error if the completion service fails
    pub async fn ask_basic(&self, question: &str) -> Result<String> {
        self.complete(PromptKind::Basic, basic_prompt(question)).await
    }

    /// Answer grounded in retrieved context
    ///
    /// Retrieves context for the question when `context` is `None`.
    ///
    /// # Errors
    ///
    /// Returns error if retrieval or the completion service fails
    pub async fn ask_grounded(&self, question: &str, context: Option<&str>) -> Result<String> {
        let prompt = match context {
            Some(context) => grounded_prompt(question, context),
            None => grounded_prompt(question, &self.context(question)?),
        };
        self.complete(PromptKind::Grounded, prompt).await
    }

    /// Ask both variants, sharing one retrieved context
    ///
    /// # Errors
    ///
    /// Returns error if retrieval or either completion fails
    pub async fn evaluate(&self, question: &str) -> Result<Evaluation> {
        let context = self.context(question)?;
        let basic_answer = self.ask_basic(question).await?;
        let grounded_answer = self.ask_grounded(question, Some(&context)).await?;

        Ok(Evaluation {
            question: question.to_string(),
            context,
            basic_answer,
            grounded_answer,
        })
    }

    async fn complete(&self, kind: PromptKind, prompt: String) -> Result<String> {
        let temperature = match kind {
            PromptKind::Basic => self.settings.basic_temperature,
            PromptKind::Grounded => self.settings.grounded_temperature,
        };

        let request = CompletionRequest {
            prompt,
            model: self.settings.model.clone(),
            temperature,
            max_tokens: self.settings.max_tokens,
        };

        tracing::info!(
            provider = self.service.name(),
            model = %request.model,
            kind = ?kind,
            prompt_bytes = request.prompt.len(),
            "requesting completion"
        );

        self.service.complete(&request).await
    }
}
