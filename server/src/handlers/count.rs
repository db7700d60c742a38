//! Count handler - reports how many answers an account has.

use crate::repository::AnswerRepository;
use answer_engine::CountResponse;

/// Process a count request for an account.
pub fn handle_count(repo: &AnswerRepository, account: &str) -> CountResponse {
    CountResponse {
        answer_count: repo.count(account) as u64,
    }
}
