//! Per-framework corpus summary

use std::collections::BTreeSet;
use std::fmt::Write;

use serde::Serialize;

use super::store::KnowledgeStore;

/// Row count and distinct versions for one framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameworkSummary {
    pub framework: String,
    pub rows: usize,
    /// Distinct versions, sorted lexicographically
    pub versions: Vec<String>,
}

impl KnowledgeStore {
    /// Summarize the corpus by framework
    ///
    /// Ordered by row count, largest first; frameworks with the same count keep
    /// the order in which they first appear in the corpus.
    #[must_use]
    pub fn summary(&self) -> Vec<FrameworkSummary> {
        let mut groups: Vec<(String, usize, BTreeSet<String>)> = Vec::new();

        for record in self.all() {
            if let Some(group) = groups.iter_mut().find(|g| g.0 == record.framework()) {
                group.1 += 1;
                group.2.insert(record.version().to_string());
            } else {
                groups.push((
                    record.framework().to_string(),
                    1,
                    BTreeSet::from([record.version().to_string()]),
                ));
            }
        }

        groups.sort_by(|a, b| b.1.cmp(&a.1));

        groups
            .into_iter()
            .map(|(framework, rows, versions)| FrameworkSummary {
                framework,
                rows,
                versions: versions.into_iter().collect(),
            })
            .collect()
    }
}

/// Render a summary as an aligned plain-text table
#[must_use]
pub fn format_summary(summary: &[FrameworkSummary]) -> String {
    let width = summary
        .iter()
        .map(|s| s.framework.len())
        .max()
        .unwrap_or(0)
        .max("framework".len());

    let mut out = format!("{:<width$}  {:>4}  versions\n", "framework", "rows");
    for entry in summary {
        let _ = writeln!(
            out,
            "{:<width$}  {:>4}  {}",
            entry.framework,
            entry.rows,
            entry.versions.join(", ")
        );
    }
    out
}
