//! Snapshot type for persisting local answers.
//!
//! Snapshots are the bridge between an in-memory [`AnswerSet`] and the
//! device's durable storage. The stored shape is a JSON array of
//! `{"questionId", "answerText"}` objects, ordered by question id.

use crate::{error::Result, AnswerRecord, AnswerSet, Error};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A point-in-time snapshot of the local answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSnapshot {
    /// Records in question id order
    pub records: Vec<AnswerRecord>,
}

impl AnswerSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture an answer set.
    pub fn from_set(set: &AnswerSet) -> Self {
        Self {
            records: set.records().collect(),
        }
    }

    /// Number of records in the snapshot.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validate the snapshot.
    ///
    /// Every question id must be non-empty and appear at most once.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if record.question_id.is_empty() {
                return Err(Error::InvalidSnapshot(
                    "record with empty question id".to_string(),
                ));
            }
            if !seen.insert(record.question_id.as_str()) {
                return Err(Error::DuplicateQuestionId(record.question_id.clone()));
            }
        }
        Ok(())
    }

    /// Validate and convert into an answer set.
    pub fn into_set(self) -> Result<AnswerSet> {
        self.validate()?;
        Ok(self
            .records
            .into_iter()
            .map(|r| (r.question_id, r.answer_text))
            .collect())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Deserialize from JSON.
    ///
    /// Blank input is read as an empty snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::new());
        }
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
