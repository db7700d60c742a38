//! Upload handler - replaces an account's answers.

use crate::error::{AppError, Result};
use crate::repository::AnswerRepository;
use answer_engine::{UploadRequest, UploadResponse};

/// Process an upload request for an account.
///
/// The request must be valid as a whole; nothing is stored otherwise.
pub fn handle_upload(
    repo: &AnswerRepository,
    account: &str,
    request: UploadRequest,
) -> Result<UploadResponse> {
    if request.answers.keys().any(|id| id.is_empty()) {
        return Err(AppError::BadRequest(
            "answer with empty question id".to_string(),
        ));
    }

    let count = repo.replace(account, request.answers);
    tracing::info!(answers = count, "Stored uploaded answers");

    Ok(UploadResponse {
        answer_count: count as u64,
    })
}
