mod common;

use axum::{Router, http::StatusCode, http::header, routing::get};
use axum_test::TestServer;
use chrono::Local;
use sqlx::PgPool;
use urlshort::api::handlers::redirect_handler;
use urlshort::utils::short_code::encode;

#[sqlx::test]
async fn test_redirect_success(pool: PgPool) {
    let (state, mut rx) = common::create_test_state(pool.clone());
    let app = Router::new()
        .route("/links/{code}", get(redirect_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let url_id = common::create_test_url(&pool, "https://example.com/target").await;
    let code = encode(url_id);

    let response = server.get(&format!("/links/{}", code)).await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://example.com/target"
    );

    let event = rx.try_recv().unwrap();
    assert_eq!(event.code, code);
    assert_eq!(event.day, Local::now().date_naive());
}

#[sqlx::test]
async fn test_redirect_custom_alias(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool.clone());
    let app = Router::new()
        .route("/links/{code}", get(redirect_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let id = urlshort::utils::short_code::decode("range").unwrap();
    common::create_test_url_with_id(&pool, id, "http://x.com").await;

    let response = server.get("/links/range").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "http://x.com"
    );
}

#[sqlx::test]
async fn test_redirect_not_found(pool: PgPool) {
    let (state, mut rx) = common::create_test_state(pool);
    let app = Router::new()
        .route("/links/{code}", get(redirect_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/links/zzzz").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(rx.try_recv().is_err());
}

#[sqlx::test]
async fn test_redirect_invalid_code(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let app = Router::new()
        .route("/links/{code}", get(redirect_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/links/a-b").await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "invalid_code");
}

#[sqlx::test]
async fn test_redirect_queues_one_hit_per_request(pool: PgPool) {
    let (state, mut rx) = common::create_test_state(pool.clone());
    let app = Router::new()
        .route("/links/{code}", get(redirect_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let url_id = common::create_test_url(&pool, "https://example.com").await;
    let code = encode(url_id);

    for _ in 0..3 {
        server
            .get(&format!("/links/{}", code))
            .await
            .assert_status(StatusCode::SEE_OTHER);
    }

    let mut queued = 0;
    while rx.try_recv().is_ok() {
        queued += 1;
    }
    assert_eq!(queued, 3);
}
