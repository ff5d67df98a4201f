#![allow(dead_code)]

use axum::{Router, routing::get};
use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;
use urlshort::api::handlers::health_handler;
use urlshort::api::routes::link_routes;
use urlshort::domain::hit_event::HitEvent;
use urlshort::state::AppState;

pub const TEST_PREFIX: &str = "https://s.test.com";

pub async fn create_test_url(pool: &PgPool, original: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO urls (original) VALUES ($1) RETURNING id")
        .bind(original)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_test_url_with_id(pool: &PgPool, id: i64, original: &str) {
    sqlx::query("INSERT INTO urls (id, original) VALUES ($1, $2)")
        .bind(id)
        .bind(original)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_test_hits(pool: &PgPool, url_id: i64, date: NaiveDate, hits: i64) {
    sqlx::query("INSERT INTO url_stats (url_id, date, hits) VALUES ($1, $2, $3)")
        .bind(url_id)
        .bind(date)
        .bind(hits)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn count_stats_rows(pool: &PgPool, url_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM url_stats WHERE url_id = $1")
        .bind(url_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_test_state(pool: PgPool) -> (AppState, mpsc::Receiver<HitEvent>) {
    let (tx, rx) = mpsc::channel(100);

    let state = AppState::new(Arc::new(pool), tx, TEST_PREFIX);

    (state, rx)
}

/// Every public route, without the outer middleware stack.
pub fn create_test_app(state: AppState) -> Router {
    Router::new()
        .merge(link_routes())
        .route("/health", get(health_handler))
        .with_state(state)
}
