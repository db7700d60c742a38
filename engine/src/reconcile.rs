//! Reconciliation logic for merging local and remote answers.
//!
//! This is the core of determinism. Given the local and remote answer sets,
//! this module produces the reconciled set, the local writes needed to reach
//! it, and counters describing how each remote key was resolved.
//!
//! # Algorithm
//!
//! Every key present in `remote` is resolved on its own:
//!
//! 1. No local answer: adopt remote
//! 2. Local equals remote: keep local
//! 3. Local contains remote: keep local
//! 4. Remote contains local: adopt remote
//! 5. Otherwise: keep both, `local + MERGE_SEPARATOR + remote`
//!
//! Keys only present in `local` are carried through verbatim and not counted.

use crate::{AnswerSet, QuestionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Separator placed between the local and remote text of a divergent answer.
pub const MERGE_SEPARATOR: &str = "\n---\n";

/// How a single remote key was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeOutcome {
    /// Local text kept as is (equal to, or a superset of, remote)
    Unchanged,
    /// Remote text written over local (local missing or contained in remote)
    AdoptedRemote,
    /// Both texts kept, joined by [`MERGE_SEPARATOR`]
    Concatenated,
}

impl MergeOutcome {
    /// Whether the local store must be written for this outcome.
    pub fn updates_local(self) -> bool {
        !matches!(self, MergeOutcome::Unchanged)
    }
}

/// Counters partitioning the remote keys by outcome.
///
/// `used_local` includes keys whose texts were identical on both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeCounters {
    /// Keys resolved with the remote text
    pub used_remote: usize,
    /// Keys resolved with the local text
    pub used_local: usize,
    /// Keys resolved by concatenation
    pub used_merged: usize,
}

impl MergeCounters {
    fn record(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Unchanged => self.used_local += 1,
            MergeOutcome::AdoptedRemote => self.used_remote += 1,
            MergeOutcome::Concatenated => self.used_merged += 1,
        }
    }

    /// Total number of keys counted. Always equals the size of the remote set.
    pub fn total(&self) -> usize {
        self.used_remote + self.used_local + self.used_merged
    }
}

impl fmt::Display for MergeCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Remote answers used: {}", self.used_remote)?;
        writeln!(f, "Local answers used: {}", self.used_local)?;
        write!(f, "Merged answers used: {}", self.used_merged)
    }
}

/// Result of reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    /// Full reconciled set, to be uploaded as the new remote set
    pub reconciled: AnswerSet,
    /// Entries the local store must upsert to match `reconciled`
    pub local_deltas: AnswerSet,
    /// Outcome for every remote key
    pub outcomes: BTreeMap<QuestionId, MergeOutcome>,
    /// Aggregate counters over `outcomes`
    pub counters: MergeCounters,
}

/// Resolve one question given its local text (if any) and its remote text.
///
/// Returns the outcome and the text the reconciled set should hold.
pub fn resolve(local: Option<&str>, remote: &str) -> (MergeOutcome, String) {
    match local {
        None => (MergeOutcome::AdoptedRemote, remote.to_string()),
        Some(local) if local == remote => (MergeOutcome::Unchanged, local.to_string()),
        Some(local) if local.contains(remote) => (MergeOutcome::Unchanged, local.to_string()),
        Some(local) if remote.contains(local) => {
            (MergeOutcome::AdoptedRemote, remote.to_string())
        }
        Some(local) => (
            MergeOutcome::Concatenated,
            format!("{local}{MERGE_SEPARATOR}{remote}"),
        ),
    }
}

/// Merge a local and a remote answer set.
///
/// Pure and deterministic: no IO, and identical inputs give identical results.
pub fn merge(local: &AnswerSet, remote: &AnswerSet) -> MergeResult {
    let mut reconciled = local.clone();
    let mut local_deltas = AnswerSet::new();
    let mut outcomes = BTreeMap::new();
    let mut counters = MergeCounters::default();

    for (question_id, remote_text) in remote {
        let (outcome, text) = resolve(local.get(question_id), remote_text);

        if outcome.updates_local() {
            local_deltas.insert(question_id.clone(), text.clone());
        }
        reconciled.insert(question_id.clone(), text);
        counters.record(outcome);
        outcomes.insert(question_id.clone(), outcome);
    }

    MergeResult {
        reconciled,
        local_deltas,
        outcomes,
        counters,
    }
}
