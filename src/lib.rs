//! EA Copilot - retrieval-grounded answers about enterprise architecture frameworks
//!
//! This library provides:
//! - A curated, immutable corpus of framework artifacts (DoDAF, MODAF, NAF,
//!   UAF, TOGAF, Zachman, FEAF, NIST CPS AF, ArchiMate)
//! - Keyword-overlap context retrieval with a seeded sampling fallback
//! - Prompt assembly and an OpenAI-compatible completion client
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  Question                    │
//! └──────────────────────┬───────────────────────┘
//!                        │
//! ┌──────────────────────▼───────────────────────┐
//! │   ContextRetriever  ──▶  KnowledgeStore      │
//! │   tokenize │ score │ top-k / seeded sample   │
//! └──────────────────────┬───────────────────────┘
//!                        │ context
//! ┌──────────────────────▼───────────────────────┐
//! │   Copilot: basic prompt │ grounded prompt    │
//! │            CompletionService                 │
//! └──────────────────────────────────────────────┘
//! ```

pub mod completion;
pub mod config;
pub mod copilot;
pub mod demo;
pub mod error;
pub mod knowledge;
pub mod prompt;

pub use completion::{CompletionRequest, CompletionService, OpenAiCompletion};
pub use config::Config;
pub use copilot::{Copilot, CopilotSettings, Evaluation};
pub use error::{Error, Result};
pub use knowledge::{
    ContextRetriever, FrameworkSummary, KnowledgeRecord, KnowledgeStore, RawRecord, ScoredRecord,
    Selection, format_summary, retrieve, score, tokenize,
};
pub use prompt::{PromptKind, basic_prompt, grounded_prompt};
