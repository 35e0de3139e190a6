//! Shared test utilities

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use ea_copilot::{CompletionRequest, CompletionService, KnowledgeStore, RawRecord, Result};
use tokio::sync::Mutex;

/// Two-record corpus used by the capability/nonsense scenarios
#[must_use]
pub fn scenario_store() -> KnowledgeStore {
    KnowledgeStore::load(vec![
        RawRecord::new(
            "DoDAF",
            "2.02",
            "CV-2 Capability Taxonomy",
            "Decomposes enterprise capabilities into a structured hierarchy.",
        ),
        RawRecord::new(
            "TOGAF",
            "10",
            "Architecture Repository",
            "Central store containing reference models.",
        ),
    ])
    .expect("failed to load scenario store")
}

/// The curated corpus shipped with the crate
#[must_use]
pub fn embedded_store() -> KnowledgeStore {
    KnowledgeStore::embedded().expect("failed to load embedded corpus")
}

/// Mock completion service that records prompts and answers by prompt kind
#[derive(Default)]
pub struct MockCompletion {
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletion {
    pub async fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }
}

#[async_trait]
impl CompletionService for MockCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().await.push(request.clone());
        if request.prompt.contains("Context:") {
            Ok("grounded".to_string())
        } else {
            Ok("basic".to_string())
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
