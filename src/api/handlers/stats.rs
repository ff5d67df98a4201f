//! Handler for link statistics endpoint.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns hit statistics for a short link.
///
/// # Endpoint
///
/// `GET /links/{code}/stats`
///
/// # Response
///
/// ```json
/// {
///   "original": "https://example.com",
///   "short": "https://s.example.com/links/range",
///   "total": 42,
///   "histogram": [
///     {
///       "date": "2024-06-01",
///       "hits": 12,
///       "created_at": "2024-06-01T08:12:00Z",
///       "updated_at": "2024-06-01T21:40:00Z"
///     }
///   ],
///   "created_at": "2024-05-20T10:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 500 Internal Server Error if any part of the report cannot be read,
/// including for an invalid or unknown code.
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let report = state.resolution_service.stats(&code).await?;

    Ok(Json(StatsResponse::from_report(report, &state.prefix)))
}
