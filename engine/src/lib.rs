//! # Answer Engine
//!
//! A deterministic reconciliation engine for free-text study answers.
//!
//! This crate holds the core logic for keeping a device's local answers and
//! the server's copy of them in step. Both replicas may be edited offline and
//! share no edit history, so the engine resolves each question independently
//! with a shallow containment heuristic instead of a text diff.
//!
//! ## Design Principles
//!
//! - **No IO**: Engine has no knowledge of files, network, or platform
//! - **Deterministic**: Same inputs always produce same outputs
//! - **Total**: Merging never fails for well-formed answer sets
//! - **Portable**: Runs anywhere Rust runs, including behind the C [`ffi`]
//!
//! ## Core Concepts
//!
//! ### Answer sets
//!
//! An [`AnswerSet`] maps a question identifier to the answer text for one
//! replica. Iteration and serialization are ordered by question id.
//!
//! ### Reconciliation
//!
//! [`merge`] takes the local and remote sets and decides, per remote key:
//! - [`MergeOutcome::AdoptedRemote`] - local is missing or contained in remote
//! - [`MergeOutcome::Unchanged`] - local equals or contains remote
//! - [`MergeOutcome::Concatenated`] - neither contains the other, both are kept
//!   joined by [`MERGE_SEPARATOR`]
//!
//! ## Quick Start
//!
//! ```rust
//! use answer_engine::{merge, AnswerSet};
//!
//! let local: AnswerSet = [("q1", "Faith"), ("q2", "Love is patient")]
//!     .into_iter()
//!     .collect();
//! let remote: AnswerSet = [("q1", "Hope"), ("q2", "Love"), ("q3", "Grace")]
//!     .into_iter()
//!     .collect();
//!
//! let result = merge(&local, &remote);
//!
//! assert_eq!(result.reconciled.get("q1"), Some("Faith\n---\nHope"));
//! assert_eq!(result.reconciled.get("q2"), Some("Love is patient"));
//! assert_eq!(result.reconciled.get("q3"), Some("Grace"));
//! assert_eq!(result.counters.used_remote, 1);
//! assert_eq!(result.counters.used_local, 1);
//! assert_eq!(result.counters.used_merged, 1);
//! assert_eq!(result.local_deltas.len(), 2);
//! ```
//!
//! ## Formats
//!
//! - [`AnswerSnapshot`] is the durable local format
//!   (`[{"questionId", "answerText"}]`).
//! - [`exchange`] is the user-facing export/import text (`[{"id", "value"}]`).
//! - [`wire`] holds the request and response bodies of the remote answer RPCs.

pub mod error;
pub mod exchange;
pub mod ffi;
pub mod reconcile;
pub mod record;
pub mod snapshot;
pub mod wire;

// Re-export main types at crate root
pub use error::Error;
pub use exchange::{export_text, import_text, ExchangeEntry};
pub use reconcile::{merge, resolve, MergeCounters, MergeOutcome, MergeResult, MERGE_SEPARATOR};
pub use record::{AnswerRecord, AnswerSet};
pub use snapshot::AnswerSnapshot;
pub use wire::{CountResponse, DownloadResponse, UploadRequest, UploadResponse};

/// Identifier of a question within a lesson.
pub type QuestionId = String;
