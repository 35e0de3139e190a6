//! Knowledge records describing architecture framework artifacts

use crate::{Error, Result};

/// Raw, unvalidated field tuple as authored or read from a corpus file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub framework: String,
    pub version: String,
    pub object: String,
    pub description: String,
}

impl RawRecord {
    /// Build a raw record from string slices
    #[must_use]
    pub fn new(framework: &str, version: &str, object: &str, description: &str) -> Self {
        Self {
            framework: framework.to_string(),
            version: version.to_string(),
            object: object.to_string(),
            description: description.to_string(),
        }
    }
}

/// A validated corpus entry with its derived searchable text
///
/// `text` and `text_lower` are computed once in [`KnowledgeRecord::from_raw`]
/// and there is no way to edit them independently of the source fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeRecord {
    framework: String,
    version: String,
    object: String,
    description: String,
    text: String,
    text_lower: String,
}

impl KnowledgeRecord {
    /// Validate a raw record and derive its searchable text
    ///
    /// Fields are trimmed; a field that is empty after trimming is rejected.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` naming the first empty field
    pub fn from_raw(row: usize, raw: RawRecord) -> Result<Self> {
        let framework = required(row, "framework", raw.framework)?;
        let version = required(row, "version", raw.version)?;
        let object = required(row, "object", raw.object)?;
        let description = required(row, "description", raw.description)?;

        let text = format!("{framework} {version} | {object} - {description}");
        let text_lower = text.to_lowercase();

        Ok(Self {
            framework,
            version,
            object,
            description,
            text,
            text_lower,
        })
    }

    #[must_use]
    pub fn framework(&self) -> &str {
        &self.framework
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn object(&self) -> &str {
        &self.object
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Canonical searchable representation shown to the completion service
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lowercased `text`, used only for scoring
    #[must_use]
    pub fn text_lower(&self) -> &str {
        &self.text_lower
    }

    /// Identity triple used for duplicate detection
    #[must_use]
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.framework, &self.version, &self.object)
    }
}

fn required(row: usize, field: &'static str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation { row, field });
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_string())
    }
}
