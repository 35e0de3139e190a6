//! Architecture framework knowledge base
//!
//! - **record**: Validated artifacts and their derived searchable text
//! - **store**: Immutable corpus, CSV import/export and the embedded dataset
//! - **retriever**: Keyword scoring and context selection
//! - **summary**: Per-framework corpus statistics

mod record;
mod retriever;
mod store;
mod summary;

pub use record::{KnowledgeRecord, RawRecord};
pub use retriever::{
    CONTEXT_SEPARATOR, ContextRetriever, ScoredRecord, Selection, retrieve, score, tokenize,
};
pub use store::KnowledgeStore;
pub use summary::{FrameworkSummary, format_summary};
