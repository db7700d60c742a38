//! # Answer Client
//!
//! Device side of answer sync: a durable local store, an HTTP gateway to the
//! answer service, and the orchestrator that reconciles the two.
//!
//! ## Example
//!
//! ```no_run
//! use answer_client::{Credential, FileAnswerStore, HttpAnswerGateway, SyncOrchestrator};
//! use std::time::Duration;
//!
//! # async fn run() -> answer_client::Result<()> {
//! let gateway = HttpAnswerGateway::new("http://localhost:3000", Duration::from_secs(30))?;
//! let store = FileAnswerStore::new("answers.json");
//! let orchestrator = SyncOrchestrator::with_credential(gateway, store, Credential::new("token"));
//!
//! let report = orchestrator.sync().await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod store;

pub use config::{ClientConfig, ConfigError};
pub use error::{Result, StoreError, SyncError};
pub use gateway::{AnswerGateway, Credential, HttpAnswerGateway};
pub use orchestrator::{AnswerCount, AnswerCounts, SyncOrchestrator, SyncPhase, SyncReport};
pub use store::{AnswerStore, FileAnswerStore, MemoryAnswerStore};
