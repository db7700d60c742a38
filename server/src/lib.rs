//! Answer Server - reference service for remote answer storage.
//!
//! Implements the three answer RPCs the client gateway talks to:
//! download, upload (replace-all), and count. Each bearer token selects
//! one account's answer set.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod repository;
pub mod routes;

use crate::config::Config;
use crate::repository::AnswerRepository;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<AnswerRepository>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build state with an empty repository.
    pub fn new(config: Config) -> Self {
        Self {
            repository: AnswerRepository::new_shared(),
            config: Arc::new(config),
        }
    }
}

/// Build the application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
