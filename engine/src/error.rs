//! Error types for the answer engine.

use crate::QuestionId;
use thiserror::Error;

/// All possible errors from the answer engine.
///
/// Merging itself is total and never produces one of these; they come from
/// decoding the persisted, exchanged, and wire formats.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("question id must not be empty")]
    EmptyQuestionId,

    #[error("duplicate question id: {0}")]
    DuplicateQuestionId(QuestionId),

    // Format errors
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("invalid exchange text: {0}")]
    InvalidExchange(String),

    #[error("no answers to import")]
    EmptyImport,

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::DuplicateQuestionId("q1".into());
        assert_eq!(err.to_string(), "duplicate question id: q1");

        let err = Error::MalformedResponse("answers is a number".into());
        assert_eq!(err.to_string(), "malformed response: answers is a number");

        assert_eq!(Error::EmptyImport.to_string(), "no answers to import");
        assert_eq!(
            Error::EmptyQuestionId.to_string(),
            "question id must not be empty"
        );
    }
}
