//! Download handler - serves an account's answers to clients.

use crate::error::Result;
use crate::repository::AnswerRepository;
use answer_engine::DownloadResponse;

/// Process a download request for an account.
///
/// Answers are sent string-encoded, with the `"[]"` marker for an empty set.
pub fn handle_download(repo: &AnswerRepository, account: &str) -> Result<DownloadResponse> {
    let answers = repo.answers(account);
    tracing::info!(answers = answers.len(), "Serving answer download");
    Ok(DownloadResponse::from_set(&answers)?)
}
