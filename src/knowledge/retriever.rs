//! Keyword-overlap context selection
//!
//! Scoring is deliberately literal: each keyword is counted as a raw substring
//! of the record's lowercased text, so "capabilit" also hits "capabilities".
//! Switching to word-boundary matching would change which records are chosen.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::record::KnowledgeRecord;
use super::store::{KnowledgeStore, sample_indices};
use crate::{Error, Result};

/// Separator placed between records in the rendered context
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Maximal runs of lowercase ASCII letters and digits
static KEYWORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("valid regex"));

/// A record paired with its relevance for one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredRecord<'a> {
    pub record: &'a KnowledgeRecord,
    pub relevance: usize,
}

/// Outcome of a selection, before rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
    /// Selected records in output order
    pub records: Vec<ScoredRecord<'a>>,
    /// Whether no keyword matched and the records were sampled instead
    pub fallback: bool,
}

impl Selection<'_> {
    /// Join the selected records' text into one context block
    #[must_use]
    pub fn render(&self) -> String {
        self.records
            .iter()
            .map(|scored| scored.record.text())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }
}

/// Extract the keyword set from a question
///
/// Falls back to whitespace-separated lowercase tokens when the question has no
/// alphanumeric run at all (e.g. `"???"`). The result can still be empty for a
/// blank question.
#[must_use]
pub fn tokenize(question: &str) -> BTreeSet<String> {
    let lowered = question.to_lowercase();

    let keywords: BTreeSet<String> = KEYWORD_REGEX
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect();

    if keywords.is_empty() {
        return lowered.split_whitespace().map(str::to_string).collect();
    }

    keywords
}

/// Sum of non-overlapping, left-to-right substring occurrences of every keyword
///
/// `"aa"` occurs once in `"aaa"`. Empty keywords never match.
#[must_use]
pub fn score(text_lower: &str, keywords: &BTreeSet<String>) -> usize {
    keywords
        .iter()
        .filter(|keyword| !keyword.is_empty())
        .map(|keyword| text_lower.matches(keyword.as_str()).count())
        .sum()
}

/// Selects the records most relevant to a question from a [`KnowledgeStore`]
///
/// Holds no state beyond the borrowed store; every call is a pure function of
/// its arguments.
#[derive(Debug, Clone, Copy)]
pub struct ContextRetriever<'a> {
    store: &'a KnowledgeStore,
}

impl<'a> ContextRetriever<'a> {
    #[must_use]
    pub const fn new(store: &'a KnowledgeStore) -> Self {
        Self { store }
    }

    /// Score every record in corpus order
    #[must_use]
    pub fn rank(&self, question: &str) -> Vec<ScoredRecord<'a>> {
        let keywords = tokenize(question);
        tracing::trace!(?keywords, "question keywords");

        self.store
            .all()
            .iter()
            .map(|record| ScoredRecord {
                record,
                relevance: score(record.text_lower(), &keywords),
            })
            .collect()
    }

    /// Choose up to `top_k` records for a question
    ///
    /// Records are ordered by relevance, highest first, with corpus order kept
    /// among equal scores. When nothing scores above zero, a seeded random
    /// sample is returned instead.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `top_k` is zero
    pub fn select(&self, question: &str, top_k: usize, seed: u64) -> Result<Selection<'a>> {
        if top_k == 0 {
            return Err(Error::InvalidArgument(
                "top_k must be a positive integer".to_string(),
            ));
        }

        let mut scored = self.rank(question);
        let max_relevance = scored.iter().map(|s| s.relevance).max().unwrap_or(0);

        if max_relevance == 0 {
            let records = sample_indices(scored.len(), top_k, seed)
                .into_iter()
                .map(|i| scored[i])
                .collect::<Vec<_>>();
            tracing::debug!(top_k, seed, selected = records.len(), "no keyword overlap, sampling");
            return Ok(Selection {
                records,
                fallback: true,
            });
        }

        // sort_by_key is stable, which is what keeps ties in corpus order
        scored.sort_by_key(|s| Reverse(s.relevance));
        scored.truncate(top_k);

        tracing::debug!(top_k, max_relevance, selected = scored.len(), "ranked context");
        Ok(Selection {
            records: scored,
            fallback: false,
        })
    }

    /// Render the selected records as a single context string
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `top_k` is zero
    pub fn retrieve(&self, question: &str, top_k: usize, seed: u64) -> Result<String> {
        Ok(self.select(question, top_k, seed)?.render())
    }
}

/// Free-function form of [`ContextRetriever::retrieve`]
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if `top_k` is zero
pub fn retrieve(
    question: &str,
    top_k: usize,
    corpus: &KnowledgeStore,
    random_seed: u64,
) -> Result<String> {
    ContextRetriever::new(corpus).retrieve(question, top_k, random_seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::RawRecord;

    fn keywords(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| (*w).to_string()).collect()
    }

    fn scenario_store() -> KnowledgeStore {
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
        .unwrap()
    }

    // Tokenization

    #[test]
    fn test_tokenize_extracts_alphanumeric_runs() {
        let tokens = tokenize("How do DoDAF CV-2 and CV-5 differ?");
        assert_eq!(
            tokens,
            keywords(&["how", "do", "dodaf", "cv", "2", "and", "5", "differ"])
        );
    }

    #[test]
    fn test_tokenize_collapses_duplicates() {
        assert_eq!(tokenize("Phase phase PHASE"), keywords(&["phase"]));
    }

    #[test]
    fn test_tokenize_punctuation_only_falls_back_to_whitespace() {
        assert_eq!(tokenize("??? !!"), keywords(&["???", "!!"]));
    }

    #[test]
    fn test_tokenize_empty_question() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_tokenize_skips_non_ascii_letters() {
        assert_eq!(tokenize("naïve edge"), keywords(&["na", "ve", "edge"]));
    }

    // Scoring

    #[test]
    fn test_score_counts_substrings_inside_words() {
        let text = "capabilities and capability phasing";
        assert_eq!(score(text, &keywords(&["capabilit"])), 2);
    }

    #[test]
    fn test_score_repeated_keyword() {
        let text = "capability one, capability two, capability three";
        assert!(score(text, &keywords(&["capability"])) >= 3);
    }

    #[test]
    fn test_score_sums_across_keywords() {
        let text = "cv-2 capability taxonomy";
        assert_eq!(score(text, &keywords(&["capability", "taxonomy", "cv"])), 3);
    }

    #[test]
    fn test_score_non_overlapping() {
        assert_eq!(score("aaa", &keywords(&["aa"])), 1);
        assert_eq!(score("aaaa", &keywords(&["aa"])), 2);
    }

    #[test]
    fn test_score_empty_keywords() {
        assert_eq!(score("anything", &BTreeSet::new()), 0);
        assert_eq!(score("anything", &keywords(&[""])), 0);
    }

    // Selection

    #[test]
    fn test_capability_taxonomy_scenario() {
        let store = scenario_store();
        let context = retrieve("capability taxonomy", 1, &store, 42).unwrap();
        assert_eq!(
            context,
            "DoDAF 2.02 | CV-2 Capability Taxonomy - Decomposes enterprise capabilities into a structured hierarchy."
        );
    }

    #[test]
    fn test_nonsense_scenario_samples_everything() {
        let store = scenario_store();
        let retriever = ContextRetriever::new(&store);

        let selection = retriever.select("zzz nonsense", 2, 7).unwrap();
        assert!(selection.fallback);
        assert_eq!(selection.records.len(), 2);

        let first = retriever.retrieve("zzz nonsense", 2, 7).unwrap();
        let second = retriever.retrieve("zzz nonsense", 2, 7).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("CV-2 Capability Taxonomy"));
        assert!(first.contains("Architecture Repository"));
    }

    #[test]
    fn test_punctuation_question_triggers_fallback() {
        let store = scenario_store();
        let selection = ContextRetriever::new(&store).select("???", 1, 3).unwrap();
        assert!(selection.fallback);
        assert_eq!(selection.records.len(), 1);
        assert_eq!(selection.records[0].relevance, 0);
    }

    #[test]
    fn test_fallback_independent_of_question() {
        let store = KnowledgeStore::embedded().unwrap();
        let retriever = ContextRetriever::new(&store);
        let a = retriever.retrieve("zzz", 4, 11).unwrap();
        let b = retriever.retrieve("qqq xxx", 4, 11).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let store = KnowledgeStore::load(vec![
            RawRecord::new("A", "1", "First", "Mentions gateway."),
            RawRecord::new("B", "1", "Second", "Mentions gateway twice, gateway."),
            RawRecord::new("C", "1", "Third", "Mentions gateway."),
        ])
        .unwrap();
        let retriever = ContextRetriever::new(&store);

        let selection = retriever.select("gateway", 3, 0).unwrap();
        let objects: Vec<&str> = selection
            .records
            .iter()
            .map(|s| s.record.object())
            .collect();
        assert_eq!(objects, vec!["Second", "First", "Third"]);

        let only_two = retriever.select("gateway", 2, 0).unwrap();
        assert_eq!(only_two.records[1].record.object(), "First");
    }

    #[test]
    fn test_zero_scored_records_fill_remaining_slots() {
        let store = scenario_store();
        let selection = ContextRetriever::new(&store)
            .select("taxonomy", 2, 0)
            .unwrap();
        assert!(!selection.fallback);
        assert_eq!(selection.records[0].relevance, 1);
        assert_eq!(selection.records[1].relevance, 0);
    }

    #[test]
    fn test_top_k_zero_is_invalid() {
        let store = scenario_store();
        let err = retrieve("capability", 0, &store, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_top_k_clamped_to_corpus() {
        let store = scenario_store();
        let context = retrieve("capability", 10, &store, 1).unwrap();
        assert_eq!(context.split(CONTEXT_SEPARATOR).count(), 2);
    }

    #[test]
    fn test_empty_store_yields_empty_context() {
        let store = KnowledgeStore::default();
        let selection = ContextRetriever::new(&store).select("anything", 3, 1).unwrap();
        assert!(selection.fallback);
        assert!(selection.render().is_empty());
    }

    #[test]
    fn test_rank_returns_corpus_order() {
        let store = scenario_store();
        let ranked = ContextRetriever::new(&store).rank("store");
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].relevance, 0);
        assert_eq!(ranked[1].relevance, 1);
    }
}
