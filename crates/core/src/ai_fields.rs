//! Review and local editing of AI-extracted document fields.
//!
//! The server returns a flat key/value map per document plus a confidence
//! score. Edits are buffered locally until the user saves; only the changed
//! keys are sent back.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::models::Document;

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// Scores at or above this are shown as high confidence.
pub const HIGH_CONFIDENCE: f64 = 0.8;

/// Scores at or above this (and below high) are medium confidence.
pub const MEDIUM_CONFIDENCE: f64 = 0.5;

/// Reject scores outside `[0.0, 1.0]`, including NaN.
pub fn validate_confidence(score: f64) -> Result<(), CoreError> {
    if (0.0..=1.0).contains(&score) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "aiConfidence must lie in [0, 1], got {score}"
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_score(score: f64) -> Result<Self, CoreError> {
        validate_confidence(score)?;
        Ok(if score >= HIGH_CONFIDENCE {
            Self::High
        } else if score >= MEDIUM_CONFIDENCE {
            Self::Medium
        } else {
            Self::Low
        })
    }
}

/// Whether a document's extracted fields should be reviewed by the user.
///
/// Fields with no score, or an out-of-range score, are treated as low
/// confidence. Documents without extracted fields need no review.
pub fn needs_review(document: &Document) -> bool {
    let has_fields = document.ai_fields.as_ref().is_some_and(|f| !f.is_empty());
    if !has_fields {
        return false;
    }
    let band = document
        .ai_confidence
        .and_then(|score| ConfidenceBand::from_score(score).ok())
        .unwrap_or(ConfidenceBand::Low);
    band != ConfidenceBand::High
}

// ---------------------------------------------------------------------------
// Edit buffer
// ---------------------------------------------------------------------------

/// Local edits layered over the server's extracted fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiFieldEdits {
    original: BTreeMap<String, String>,
    edits: BTreeMap<String, String>,
}

impl AiFieldEdits {
    pub fn from_document(document: &Document) -> Self {
        Self::new(document.ai_fields.clone().unwrap_or_default())
    }

    pub fn new(original: BTreeMap<String, String>) -> Self {
        Self {
            original,
            edits: BTreeMap::new(),
        }
    }

    /// Set a field. Setting it back to the server value drops the edit.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if self.original.get(key) == Some(&value) {
            self.edits.remove(key);
        } else {
            self.edits.insert(key.to_string(), value);
        }
    }

    /// Discard the local edit for one field.
    pub fn revert(&mut self, key: &str) {
        self.edits.remove(key);
    }

    pub fn revert_all(&mut self) {
        self.edits.clear();
    }

    pub fn is_dirty(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Current value of a field, edited or original.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.edits
            .get(key)
            .or_else(|| self.original.get(key))
            .map(String::as_str)
    }

    /// Only the edited keys, as sent on save.
    pub fn changes(&self) -> &BTreeMap<String, String> {
        &self.edits
    }

    /// Full field map with edits applied.
    pub fn merged(&self) -> BTreeMap<String, String> {
        let mut merged = self.original.clone();
        merged.extend(self.edits.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// Accept a saved result from the server as the new baseline.
    pub fn commit(&mut self, saved: BTreeMap<String, String>) {
        self.original = saved;
        self.edits.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
