//! Authentication extractor.
//!
//! The bearer token is the opaque account credential: it authenticates the
//! request and selects the answer set it operates on.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::AppState;

/// Authenticated account extracted from request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The bearer token
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let token = match auth_header {
            Some(header) if header.starts_with("Bearer ") => {
                header.trim_start_matches("Bearer ").trim()
            }
            Some(_) => {
                tracing::debug!("Rejected malformed authorization header");
                return Err(AppError::Unauthorized);
            }
            None => {
                tracing::debug!("Rejected request without authorization header");
                return Err(AppError::Unauthorized);
            }
        };

        if !state.config.accepts_token(token) {
            tracing::debug!("Rejected unknown access token");
            return Err(AppError::Unauthorized);
        }

        Ok(AuthUser {
            token: token.to_string(),
        })
    }
}
