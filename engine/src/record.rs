//! Answer records and answer sets.

use crate::QuestionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single answer as it is persisted on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    /// Question this answer belongs to (non-empty)
    pub question_id: QuestionId,
    /// Free-text answer, possibly empty
    pub answer_text: String,
}

impl AnswerRecord {
    /// Create a new record.
    pub fn new(question_id: impl Into<QuestionId>, answer_text: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            answer_text: answer_text.into(),
        }
    }
}

/// Mapping from question id to answer text for one replica.
///
/// Backed by a `BTreeMap` so iteration and serialization order are
/// deterministic. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<QuestionId, String>,
}

impl AnswerSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            answers: BTreeMap::new(),
        }
    }

    /// Get the answer for a question.
    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    /// Insert or overwrite an answer, returning the previous text.
    pub fn insert(
        &mut self,
        question_id: impl Into<QuestionId>,
        answer_text: impl Into<String>,
    ) -> Option<String> {
        self.answers.insert(question_id.into(), answer_text.into())
    }

    /// Check if an answer exists for a question.
    pub fn contains(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }

    /// Number of answers.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Check if the set has no answers.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Question ids in order.
    pub fn keys(&self) -> impl Iterator<Item = &QuestionId> {
        self.answers.keys()
    }

    /// `(question_id, answer_text)` pairs in question id order.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &String)> {
        self.answers.iter()
    }

    /// Records in question id order.
    pub fn records(&self) -> impl Iterator<Item = AnswerRecord> + '_ {
        self.answers
            .iter()
            .map(|(id, text)| AnswerRecord::new(id.clone(), text.clone()))
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerSet
where
    K: Into<QuestionId>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = AnswerSet::new();
        set.extend(iter);
        set
    }
}

impl<K, V> Extend<(K, V)> for AnswerSet
where
    K: Into<QuestionId>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (id, text) in iter {
            self.insert(id, text);
        }
    }
}

impl IntoIterator for AnswerSet {
    type Item = (QuestionId, String);
    type IntoIter = std::collections::btree_map::IntoIter<QuestionId, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.answers.into_iter()
    }
}

impl<'a> IntoIterator for &'a AnswerSet {
    type Item = (&'a QuestionId, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, QuestionId, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.answers.iter()
    }
}
