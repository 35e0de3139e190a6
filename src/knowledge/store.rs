//! Immutable corpus of architecture framework artifacts

use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use super::record::{KnowledgeRecord, RawRecord};
use crate::Result;

/// Curated corpus shipped with the binary
const EMBEDDED_CORPUS: &str = include_str!("../../data/architecture_framework_knowledge.csv");

/// One CSV row; column names are part of the file format
#[derive(Debug, Default, Serialize, Deserialize)]
struct CsvRow {
    #[serde(default)]
    framework: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    object: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    text: Option<String>,
}

/// Read-only, ordered collection of knowledge records
///
/// Constructed once and never mutated afterwards, so a shared reference can be
/// handed to any number of concurrent retrievals.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    records: Vec<KnowledgeRecord>,
}

impl KnowledgeStore {
    /// Build a store from raw field tuples, deriving each record's text
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if any required field is empty
    pub fn load<I>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let records = raw
            .into_iter()
            .enumerate()
            .map(|(row, raw)| KnowledgeRecord::from_raw(row, raw))
            .collect::<Result<Vec<_>>>()?;

        warn_on_duplicates(&records);
        tracing::debug!(rows = records.len(), "knowledge store loaded");

        Ok(Self { records })
    }

    /// Load the curated corpus compiled into the crate
    ///
    /// # Errors
    ///
    /// Returns error if the embedded CSV is malformed
    pub fn embedded() -> Result<Self> {
        Self::from_reader(EMBEDDED_CORPUS.as_bytes())
    }

    /// Load a corpus CSV from disk
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not valid CSV, or contains
    /// a row with an empty required field
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let store = Self::from_reader(file)?;
        tracing::info!(path = %path.display(), rows = store.len(), "loaded corpus file");
        Ok(store)
    }

    /// Load a corpus from CSV with a `framework,version,object,description,text` header
    ///
    /// The `text` column is optional and always recomputed; a stored value that
    /// disagrees with the recomputed one is logged and discarded.
    ///
    /// # Errors
    ///
    /// Returns error on malformed CSV or an empty required field
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().from_reader(reader);

        let mut rows = Vec::new();
        for row in csv_reader.deserialize::<CsvRow>() {
            rows.push(row?);
        }

        let store = Self::load(rows.iter().map(|row| RawRecord {
            framework: row.framework.clone(),
            version: row.version.clone(),
            object: row.object.clone(),
            description: row.description.clone(),
        }))?;

        for (row, (stored, record)) in rows.iter().zip(&store.records).enumerate() {
            if let Some(text) = stored.text.as_deref()
                && text.trim() != record.text()
            {
                tracing::warn!(row, object = record.object(), "stale text column, recomputed");
            }
        }

        Ok(store)
    }

    /// Write the corpus as CSV, including the derived `text` column
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the underlying writer fails
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in &self.records {
            csv_writer.serialize(CsvRow {
                framework: record.framework().to_string(),
                version: record.version().to_string(),
                object: record.object().to_string(),
                description: record.description().to_string(),
                text: Some(record.text().to_string()),
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the corpus CSV to a file, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or written
    pub fn write_csv_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        self.write_csv(file)?;
        tracing::info!(path = %path.display(), rows = self.len(), "wrote corpus file");
        Ok(())
    }

    /// Full corpus in stable order
    #[must_use]
    pub fn all(&self) -> &[KnowledgeRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Seeded preview of up to `n` records
    #[must_use]
    pub fn sample(&self, n: usize, seed: u64) -> Vec<&KnowledgeRecord> {
        sample_indices(self.records.len(), n, seed)
            .into_iter()
            .map(|i| &self.records[i])
            .collect()
    }
}

/// Pick `min(amount, len)` distinct indices uniformly at random
///
/// A fresh generator is seeded on every call, so the result depends only on
/// the arguments.
pub(crate) fn sample_indices(len: usize, amount: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    index::sample(&mut rng, len, amount.min(len)).into_vec()
}

fn warn_on_duplicates(records: &[KnowledgeRecord]) {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.key()) {
            tracing::warn!(
                framework = record.framework(),
                version = record.version(),
                object = record.object(),
                "duplicate knowledge record"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn two_rows() -> Vec<RawRecord> {
        vec![
            RawRecord::new("DoDAF", "2.02", "CV-1 Vision", "Problem statement."),
            RawRecord::new("TOGAF", "10", "Architecture Repository", "Central store."),
        ]
    }

    #[test]
    fn test_load_preserves_order() {
        let store = KnowledgeStore::load(two_rows()).unwrap();
        let objects: Vec<&str> = store.all().iter().map(KnowledgeRecord::object).collect();
        assert_eq!(objects, vec!["CV-1 Vision", "Architecture Repository"]);
    }

    #[test]
    fn test_load_keeps_duplicate_triples_in_order() {
        let rows = vec![
            RawRecord::new("DoDAF", "2.02", "CV-1 Vision", "First authoring."),
            RawRecord::new("DoDAF", "2.02", "CV-1 Vision", "Second authoring."),
        ];

        let store = KnowledgeStore::load(rows).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].key(), store.all()[1].key());
        assert_eq!(store.all()[0].description(), "First authoring.");
        assert_eq!(store.all()[1].description(), "Second authoring.");

        let context = crate::knowledge::retrieve("vision", 1, &store, 0).unwrap();
        assert_eq!(context, "DoDAF 2.02 | CV-1 Vision - First authoring.");
    }

    #[test]
    fn test_load_rejects_empty_field_with_row_index() {
        let mut rows = two_rows();
        rows.push(RawRecord::new("UAF", "1.2", "", "Missing object."));

        let err = KnowledgeStore::load(rows).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation {
                row: 2,
                field: "object"
            }
        ));
    }

    #[test]
    fn test_embedded_corpus_loads() {
        let store = KnowledgeStore::embedded().unwrap();
        assert_eq!(store.len(), 78);
        assert_eq!(store.all()[0].object(), "AV-1 Overview and Summary Information");
        assert!(store.all().iter().any(|r| r.framework() == "ArchiMate"));
    }

    #[test]
    fn test_from_reader_recomputes_text() {
        let csv = "framework,version,object,description,text\n\
                   TOGAF,10,ADM,Method.,something stale\n";
        let store = KnowledgeStore::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.all()[0].text(), "TOGAF 10 | ADM - Method.");
    }

    #[test]
    fn test_from_reader_without_text_column() {
        let csv = "framework,version,object,description\nTOGAF,10,ADM,\"Phases, steps.\"\n";
        let store = KnowledgeStore::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.all()[0].description(), "Phases, steps.");
    }

    #[test]
    fn test_from_reader_missing_column_is_validation_error() {
        let csv = "framework,version,object\nTOGAF,10,ADM\n";
        let err = KnowledgeStore::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation {
                field: "description",
                ..
            }
        ));
    }

    #[test]
    fn test_write_csv_header_and_text() {
        let store = KnowledgeStore::load(two_rows()).unwrap();
        let mut out = Vec::new();
        store.write_csv(&mut out).unwrap();

        let written = String::from_utf8(out).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("framework,version,object,description,text")
        );
        assert_eq!(
            lines.next(),
            Some("DoDAF,2.02,CV-1 Vision,Problem statement.,DoDAF 2.02 | CV-1 Vision - Problem statement.")
        );
    }

    #[test]
    fn test_write_then_read_back() {
        let store = KnowledgeStore::embedded().unwrap();
        let mut out = Vec::new();
        store.write_csv(&mut out).unwrap();

        let reloaded = KnowledgeStore::from_reader(out.as_slice()).unwrap();
        assert_eq!(reloaded.all(), store.all());
    }

    #[test]
    fn test_sample_is_seeded() {
        let store = KnowledgeStore::embedded().unwrap();
        let a: Vec<&str> = store.sample(5, 7).into_iter().map(KnowledgeRecord::text).collect();
        let b: Vec<&str> = store.sample(5, 7).into_iter().map(KnowledgeRecord::text).collect();
        assert_eq!(a.len(), 5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_clamps_to_corpus_size() {
        let store = KnowledgeStore::load(two_rows()).unwrap();
        assert_eq!(store.sample(10, 1).len(), 2);
    }

    #[test]
    fn test_sample_indices_are_distinct() {
        let mut picked = sample_indices(20, 20, 99);
        picked.sort_unstable();
        assert_eq!(picked, (0..20).collect::<Vec<_>>());
    }
}
