//! In-memory answer storage.
//!
//! Holds one answer set per account. Uploads replace an account's set
//! wholesale; there is no partial patching.

use std::sync::Arc;

use answer_engine::AnswerSet;
use dashmap::DashMap;

/// Answer sets keyed by account token.
///
/// Thread-safe and can be shared across handlers via `Arc`.
#[derive(Debug, Default)]
pub struct AnswerRepository {
    accounts: DashMap<String, AnswerSet>,
}

impl AnswerRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Create an empty repository wrapped in Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Current answers of an account. Unknown accounts have no answers.
    pub fn answers(&self, account: &str) -> AnswerSet {
        self.accounts
            .get(account)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Replace an account's answers, returning the new count.
    pub fn replace(&self, account: &str, answers: AnswerSet) -> usize {
        let count = answers.len();
        self.accounts.insert(account.to_string(), answers);
        tracing::debug!(account_count = self.accounts.len(), answers = count, "Replaced answer set");
        count
    }

    /// Number of answers stored for an account.
    pub fn count(&self, account: &str) -> usize {
        self.accounts
            .get(account)
            .map(|entry| entry.value().len())
            .unwrap_or(0)
    }
}
