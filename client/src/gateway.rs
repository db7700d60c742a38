//! Remote answer gateway.
//!
//! Thin boundary over the three remote RPCs. Every call takes the access
//! credential explicitly; the gateway itself holds no session.

use crate::config::ClientConfig;
use crate::error::{Result, SyncError};
use answer_engine::{AnswerSet, CountResponse, DownloadResponse, UploadRequest, UploadResponse};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Opaque access credential for one account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// A gateway handles network communication with the answer service.
///
/// This trait abstracts the network layer so the orchestrator can run
/// against HTTP or a scripted gateway in tests.
pub trait AnswerGateway: Send + Sync {
    /// Fetch the account's full answer set.
    fn fetch_all(&self, credential: &Credential) -> impl Future<Output = Result<AnswerSet>> + Send;

    /// Replace the account's answer set with exactly `answers`.
    ///
    /// Returns the number of answers the service now stores.
    fn replace_all(
        &self,
        credential: &Credential,
        answers: &AnswerSet,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// Number of answers stored for the account.
    fn count(&self, credential: &Credential) -> impl Future<Output = Result<u64>> + Send;
}

/// HTTP gateway speaking JSON to an answer service.
#[derive(Debug, Clone)]
pub struct HttpAnswerGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnswerGateway {
    /// Create a gateway for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Transport(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.server_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, rpc: &str) -> String {
        format!("{}/answers/{rpc}", self.base_url.trim_end_matches('/'))
    }

    async fn call<Req, Res>(
        &self,
        rpc: &str,
        credential: &Credential,
        body: Option<&Req>,
        expected: StatusCode,
    ) -> Result<Res>
    where
        Req: serde::Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let mut request = self
            .client
            .post(self.endpoint(rpc))
            .bearer_auth(credential.token());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        check_status(rpc, response.status(), expected)?;

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| SyncError::MalformedResponse(format!("{rpc}: {e}")))
    }
}

/// Map a response status to the gateway's failure taxonomy.
///
/// Only `expected` counts as success. A 401 is an authentication failure;
/// every other status is a transport failure.
fn check_status(rpc: &str, status: StatusCode, expected: StatusCode) -> Result<()> {
    if status == expected {
        Ok(())
    } else if status == StatusCode::UNAUTHORIZED {
        Err(SyncError::Auth(format!("{rpc} rejected the credential")))
    } else {
        Err(SyncError::Transport(format!(
            "{rpc} returned {status}, expected {expected}"
        )))
    }
}

impl AnswerGateway for HttpAnswerGateway {
    async fn fetch_all(&self, credential: &Credential) -> Result<AnswerSet> {
        let response: DownloadResponse = self
            .call::<(), _>("download", credential, None, StatusCode::OK)
            .await?;
        let answers = response
            .into_answer_set()
            .map_err(|e| SyncError::MalformedResponse(e.to_string()))?;

        tracing::debug!(count = answers.len(), "Downloaded answers");
        Ok(answers)
    }

    async fn replace_all(&self, credential: &Credential, answers: &AnswerSet) -> Result<u64> {
        let request = UploadRequest {
            answers: answers.clone(),
        };
        let response: UploadResponse = self
            .call("upload", credential, Some(&request), StatusCode::CREATED)
            .await?;

        tracing::debug!(count = response.answer_count, "Uploaded answers");
        Ok(response.answer_count)
    }

    async fn count(&self, credential: &Credential) -> Result<u64> {
        let response: CountResponse = self
            .call::<(), _>("count", credential, None, StatusCode::OK)
            .await?;
        Ok(response.answer_count)
    }
}
