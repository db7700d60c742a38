//! Sync orchestrator.
//!
//! Drives the download, merge and upload phases against a gateway and a
//! local store. One flow runs at a time; a request made while a flow is in
//! progress is rejected with [`SyncError::Busy`], never queued.

use crate::error::{Result, SyncError};
use crate::gateway::{AnswerGateway, Credential};
use crate::store::AnswerStore;
use answer_engine::{export_text, import_text, merge, MergeCounters};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use tokio::sync::watch;

/// Phase of the running flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No flow running.
    Idle,
    /// Fetching the remote set.
    Downloading,
    /// Reconciling and writing local deltas.
    Merging,
    /// Replacing the remote set.
    Uploading,
    /// The flow failed. Returns to idle once the flow has unwound.
    Failed,
}

impl SyncPhase {
    /// Returns true while a network or merge phase is running.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SyncPhase::Downloading | SyncPhase::Merging | SyncPhase::Uploading
        )
    }
}

/// Outcome of a completed flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncReport {
    /// Two-way sync finished with these counters.
    TwoWay(MergeCounters),
    /// Local answers replaced the remote set.
    Uploaded { count: u64 },
    /// Remote answers were written into the local store.
    Downloaded { count: u64 },
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncReport::TwoWay(counters) => write!(f, "{counters}"),
            SyncReport::Uploaded { count } => write!(f, "Uploaded {count} answers"),
            SyncReport::Downloaded { count } => write!(f, "Downloaded {count} answers"),
        }
    }
}

/// A count for display, or `N/A` when it could not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerCount {
    Known(u64),
    Unknown,
}

impl fmt::Display for AnswerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerCount::Known(n) => write!(f, "{n}"),
            AnswerCount::Unknown => f.write_str("N/A"),
        }
    }
}

/// Local and remote answer counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerCounts {
    pub local: AnswerCount,
    pub remote: AnswerCount,
}

impl fmt::Display for AnswerCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Local answers: {}", self.local)?;
        write!(f, "Remote answers: {}", self.remote)
    }
}

/// Holds the busy flag for the lifetime of one flow.
///
/// Dropping it publishes `Idle` and releases the flag, whichever way the
/// flow exits.
struct Session<'a> {
    busy: &'a AtomicBool,
    phase: &'a watch::Sender<SyncPhase>,
}

impl Session<'_> {
    fn enter(&self, phase: SyncPhase) {
        self.phase.send_replace(phase);
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.phase.send_replace(SyncPhase::Idle);
        self.busy.store(false, Ordering::Release);
    }
}

/// Coordinates the local store and the remote gateway.
pub struct SyncOrchestrator<G, S> {
    gateway: G,
    store: S,
    credential: RwLock<Option<Credential>>,
    busy: AtomicBool,
    phase: watch::Sender<SyncPhase>,
}

impl<G, S> SyncOrchestrator<G, S>
where
    G: AnswerGateway,
    S: AnswerStore,
{
    /// Create an orchestrator with no credential installed.
    pub fn new(gateway: G, store: S) -> Self {
        let (phase, _) = watch::channel(SyncPhase::Idle);
        Self {
            gateway,
            store,
            credential: RwLock::new(None),
            busy: AtomicBool::new(false),
            phase,
        }
    }

    /// Create an orchestrator signed in with `credential`.
    pub fn with_credential(gateway: G, store: S, credential: Credential) -> Self {
        let orchestrator = Self::new(gateway, store);
        orchestrator.sign_in(credential);
        orchestrator
    }

    /// Install the session credential.
    pub fn sign_in(&self, credential: Credential) {
        *self.credential.write().unwrap_or_else(|e| e.into_inner()) = Some(credential);
    }

    /// Drop the session credential.
    pub fn sign_out(&self) {
        *self.credential.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.credential
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Current phase.
    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Observe phase changes. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<SyncPhase> {
        self.phase.subscribe()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Two-way sync: download, merge, write local deltas, upload.
    ///
    /// A download failure leaves both replicas untouched. An upload failure
    /// leaves the local store updated and the remote set stale.
    pub async fn sync(&self) -> Result<SyncReport> {
        let session = self.begin()?;
        let credential = self.session_credential()?;

        match self.two_way(&session, &credential).await {
            Ok(counters) => {
                tracing::info!(
                    used_remote = counters.used_remote,
                    used_local = counters.used_local,
                    used_merged = counters.used_merged,
                    "Answers reconciled"
                );
                Ok(SyncReport::TwoWay(counters))
            }
            Err(e) => Err(self.abort(&session, e).await),
        }
    }

    async fn two_way(&self, session: &Session<'_>, credential: &Credential) -> Result<MergeCounters> {
        session.enter(SyncPhase::Downloading);
        let remote = self.gateway.fetch_all(credential).await?;

        session.enter(SyncPhase::Merging);
        let local = self.store.load()?;
        let result = merge(&local, &remote);
        for (question_id, outcome) in &result.outcomes {
            tracing::trace!(question_id = %question_id, ?outcome, "Resolved answer");
        }
        self.store.upsert_all(&result.local_deltas)?;

        session.enter(SyncPhase::Uploading);
        self.gateway
            .replace_all(credential, &result.reconciled)
            .await?;

        Ok(result.counters)
    }

    /// Replace the remote set with the local set verbatim. No merge.
    pub async fn upload_only(&self) -> Result<SyncReport> {
        let session = self.begin()?;
        let credential = self.session_credential()?;

        session.enter(SyncPhase::Uploading);
        let result = async {
            let local = self.store.load()?;
            let count = self.gateway.replace_all(&credential, &local).await?;
            Ok::<_, SyncError>(count)
        }
        .await;

        match result {
            Ok(count) => {
                tracing::info!(count, "Local answers uploaded");
                Ok(SyncReport::Uploaded { count })
            }
            Err(e) => Err(self.abort(&session, e).await),
        }
    }

    /// Write every remote answer into the local store verbatim.
    ///
    /// Overwrites local edits, so it is refused unless `confirmed`.
    pub async fn download_only(&self, confirmed: bool) -> Result<SyncReport> {
        if !confirmed {
            return Err(SyncError::NotConfirmed);
        }
        let session = self.begin()?;
        let credential = self.session_credential()?;

        session.enter(SyncPhase::Downloading);
        let result = async {
            let remote = self.gateway.fetch_all(&credential).await?;
            self.store.upsert_all(&remote)?;
            Ok::<_, SyncError>(remote.len() as u64)
        }
        .await;

        match result {
            Ok(count) => {
                tracing::info!(count, "Remote answers downloaded");
                Ok(SyncReport::Downloaded { count })
            }
            Err(e) => Err(self.abort(&session, e).await),
        }
    }

    /// Local and remote counts for display.
    ///
    /// Failures on either side are shown as `N/A` rather than returned. The
    /// remote count is `N/A` without a credential, and a rejected credential
    /// is still cleared.
    pub async fn answer_counts(&self) -> Result<AnswerCounts> {
        let _session = self.begin()?;

        let local = match self.store.count() {
            Ok(n) => AnswerCount::Known(n as u64),
            Err(e) => {
                tracing::warn!(error = %e, "Could not count local answers");
                AnswerCount::Unknown
            }
        };

        let remote = match self.session_credential() {
            Ok(credential) => self.remote_count(&credential).await,
            Err(_) => {
                tracing::debug!("Not signed in, remote count unavailable");
                AnswerCount::Unknown
            }
        };

        Ok(AnswerCounts { local, remote })
    }

    async fn remote_count(&self, credential: &Credential) -> AnswerCount {
        match self.gateway.count(credential).await {
            Ok(n) => AnswerCount::Known(n),
            Err(e) => {
                if e.is_auth_failure() {
                    self.sign_out();
                }
                tracing::warn!(error = %e, "Could not count remote answers");
                AnswerCount::Unknown
            }
        }
    }

    /// Parse exchange text and write every entry into the local store.
    ///
    /// Overwrites local edits, so it is refused unless `confirmed`.
    pub fn import_answers(&self, text: &str, confirmed: bool) -> Result<usize> {
        if !confirmed {
            return Err(SyncError::NotConfirmed);
        }
        let session = self.begin()?;

        let result = import_text(text).map_err(SyncError::from).and_then(|answers| {
            self.store.upsert_all(&answers)?;
            Ok(answers.len())
        });

        match result {
            Ok(count) => {
                tracing::info!(count, "Answers imported");
                Ok(count)
            }
            Err(e) => Err(self.fail(&session, e)),
        }
    }

    /// Render the local set as exchange text.
    pub fn export_answers(&self) -> Result<String> {
        let answers = self.store.load()?;
        Ok(export_text(&answers)?)
    }

    fn begin(&self) -> Result<Session<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SyncError::Busy)?;

        Ok(Session {
            busy: &self.busy,
            phase: &self.phase,
        })
    }

    fn session_credential(&self) -> Result<Credential> {
        self.credential
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(SyncError::NotAuthenticated)
    }

    /// Fail an async flow.
    ///
    /// Yields once after publishing `Failed` so subscribers can observe it
    /// before the session resets to idle.
    async fn abort(&self, session: &Session<'_>, error: SyncError) -> SyncError {
        let error = self.fail(session, error);
        tokio::task::yield_now().await;
        error
    }

    fn fail(&self, session: &Session<'_>, error: SyncError) -> SyncError {
        session.enter(SyncPhase::Failed);
        if error.is_auth_failure() {
            self.sign_out();
            tracing::warn!(error = %error, "Credential rejected, signed out");
        } else {
            tracing::warn!(error = %error, "Sync flow failed");
        }
        error
    }
}
