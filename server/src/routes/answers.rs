//! Answer endpoint routes.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::{handle_count, handle_download, handle_upload};
use crate::AppState;
use answer_engine::{CountResponse, DownloadResponse, UploadRequest, UploadResponse};

/// Create answer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/answers/download", post(download_handler))
        .route("/answers/upload", post(upload_handler))
        .route("/answers/count", post(count_handler))
}

/// POST /answers/download - Fetch the account's full answer set.
async fn download_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DownloadResponse>> {
    let response = handle_download(&state.repository, &auth.token)?;
    Ok(Json(response))
}

/// POST /answers/upload - Replace the account's answer set.
async fn upload_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UploadRequest>,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let response = handle_upload(&state.repository, &auth.token, request)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /answers/count - Count the account's answers.
async fn count_handler(State(state): State<AppState>, auth: AuthUser) -> Json<CountResponse> {
    Json(handle_count(&state.repository, &auth.token))
}
