//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "custom": "range"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "original": "https://example.com",
///   "short": "https://s.example.com/links/range",
///   "created_at": "2024-06-01T12:00:00Z"
/// }
/// ```
///
/// # Status Codes
///
/// - **200 OK**: Link created, or the custom alias already names this URL
/// - **400 Bad Request**: The URL was shortened before. The body is the existing link
/// - **400 Bad Request**: Unreadable body, invalid URL or alias, alias taken
/// - **500 Internal Server Error**: Store failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "could not read request",
            json!({ "reason": rejection.body_text() }),
        )
    })?;

    let outcome = state
        .resolution_service
        .shorten(payload.url, payload.custom)
        .await?;

    let status = if outcome.is_duplicate() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(ShortenResponse::from_url(outcome.into_url(), &state.prefix)),
    ))
}
