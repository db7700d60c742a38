//! Export/import text format.
//!
//! Users move answers between devices by copying a JSON array of
//! `{"id", "value"}` objects. Export is ordered by id. On import a later
//! entry for the same id overwrites an earlier one.

use crate::{error::Result, AnswerSet, Error, QuestionId};
use serde::{Deserialize, Serialize};

/// One entry of the exchange text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeEntry {
    pub id: QuestionId,
    pub value: String,
}

/// Render an answer set as exchange text.
pub fn export_text(set: &AnswerSet) -> Result<String> {
    let entries: Vec<ExchangeEntry> = set
        .iter()
        .map(|(id, value)| ExchangeEntry {
            id: id.clone(),
            value: value.clone(),
        })
        .collect();

    serde_json::to_string(&entries).map_err(|e| Error::InvalidExchange(e.to_string()))
}

/// Parse exchange text into an answer set.
///
/// Fails with [`Error::EmptyImport`] when the text holds no entries.
pub fn import_text(text: &str) -> Result<AnswerSet> {
    let entries: Vec<ExchangeEntry> =
        serde_json::from_str(text.trim()).map_err(|e| Error::InvalidExchange(e.to_string()))?;

    if entries.is_empty() {
        return Err(Error::EmptyImport);
    }

    let mut set = AnswerSet::new();
    for entry in entries {
        if entry.id.is_empty() {
            return Err(Error::EmptyQuestionId);
        }
        set.insert(entry.id, entry.value);
    }
    Ok(set)
}
