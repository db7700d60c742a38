//! Request and response bodies of the remote answer RPCs.
//!
//! The server has historically sent the download payload's `answers` field
//! as a JSON-encoded string, and as the literal string `"[]"` when the
//! account has no answers. [`DownloadResponse::into_answer_set`] accepts that
//! form as well as a plain JSON object.

use crate::{error::Result, AnswerSet, Error};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker the server sends for an account without answers.
pub const EMPTY_ANSWERS_MARKER: &str = "[]";

/// Response body of `downloadAnswers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Value>,
}

impl DownloadResponse {
    /// Encode a set the way the server sends it: a JSON string, or the empty
    /// marker when there are no answers.
    pub fn from_set(set: &AnswerSet) -> Result<Self> {
        let encoded = if set.is_empty() {
            EMPTY_ANSWERS_MARKER.to_string()
        } else {
            serde_json::to_string(set).map_err(|e| Error::MalformedResponse(e.to_string()))?
        };
        Ok(Self {
            answers: Some(Value::String(encoded)),
        })
    }

    /// Decode the answers field.
    ///
    /// An absent or null field and the empty marker are all read as the
    /// empty set. Any other shape is a malformed response.
    pub fn into_answer_set(self) -> Result<AnswerSet> {
        match self.answers {
            None | Some(Value::Null) => Ok(AnswerSet::new()),
            Some(Value::String(encoded)) => {
                if encoded.trim() == EMPTY_ANSWERS_MARKER {
                    return Ok(AnswerSet::new());
                }
                let value: Value = serde_json::from_str(&encoded)
                    .map_err(|e| Error::MalformedResponse(format!("answers string: {e}")))?;
                match value {
                    Value::String(_) => Err(Error::MalformedResponse(
                        "answers string encodes another string".to_string(),
                    )),
                    other => decode_value(other),
                }
            }
            Some(other) => decode_value(other),
        }
    }
}

fn decode_value(value: Value) -> Result<AnswerSet> {
    match value {
        Value::Null => Ok(AnswerSet::new()),
        Value::Array(items) if items.is_empty() => Ok(AnswerSet::new()),
        Value::Object(map) => {
            let mut set = AnswerSet::new();
            for (question_id, text) in map {
                if question_id.is_empty() {
                    return Err(Error::MalformedResponse(
                        "answer with empty question id".to_string(),
                    ));
                }
                match text {
                    Value::String(text) => {
                        set.insert(question_id, text);
                    }
                    other => {
                        return Err(Error::MalformedResponse(format!(
                            "answer for '{question_id}' is not a string: {other}"
                        )))
                    }
                }
            }
            Ok(set)
        }
        other => Err(Error::MalformedResponse(format!(
            "unexpected answers payload: {other}"
        ))),
    }
}

/// Request body of `uploadAnswers`. Replaces the remote set wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub answers: AnswerSet,
}

/// Response body of `uploadAnswers`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Number of answers the server now stores
    pub answer_count: u64,
}

/// Response body of `getAnswers`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub answer_count: u64,
}
