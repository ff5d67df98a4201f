//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /links/{code}`
///
/// # Hit Tracking
///
/// A hit for the current local day is handed to the background hit worker.
/// Recording never delays or fails the redirect.
///
/// # Errors
///
/// Returns 400 Bad Request if the code contains characters outside the alphabet.
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let url = state.resolution_service.redirect(&code).await?;

    Ok(Redirect::to(&url.original))
}
