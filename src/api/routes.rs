//! API route configuration.

use crate::api::handlers::{redirect_handler, shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Public link routes.
///
/// # Endpoints
///
/// - `POST /shorten`             - Create a short link
/// - `GET  /links/{code}`        - Redirect to the original URL
/// - `GET  /links/{code}/stats`  - Hit statistics of a link
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/links/{code}", get(redirect_handler))
        .route("/links/{code}/stats", get(stats_handler))
}
