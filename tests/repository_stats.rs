mod common;

use chrono::{Local, NaiveDate, TimeZone};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use urlshort::domain::hit_event::HitEvent;
use urlshort::domain::hit_worker::{HitWorkerOptions, run_hit_worker};
use urlshort::domain::repositories::StatsRepository;
use urlshort::error::AppError;
use urlshort::infrastructure::persistence::PgStatsRepository;
use urlshort::utils::short_code::encode;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[sqlx::test]
async fn test_add_hit_creates_row(pool: PgPool) {
    let repo = PgStatsRepository::new(Arc::new(pool.clone()));
    let url_id = common::create_test_url(&pool, "https://example.com").await;

    repo.add_hit(&encode(url_id), day(2024, 3, 20)).await.unwrap();

    let hits: i64 = sqlx::query_scalar("SELECT hits FROM url_stats WHERE url_id = $1")
        .bind(url_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(hits, 1);
}

#[sqlx::test]
async fn test_add_hit_increments_same_day(pool: PgPool) {
    let repo = PgStatsRepository::new(Arc::new(pool.clone()));
    let url_id = common::create_test_url(&pool, "https://example.com").await;
    let code = encode(url_id);

    for _ in 0..3 {
        repo.add_hit(&code, day(2024, 3, 20)).await.unwrap();
    }

    assert_eq!(common::count_stats_rows(&pool, url_id).await, 1);
    assert_eq!(repo.total_hits(&code).await.unwrap(), 3);
}

#[sqlx::test]
async fn test_add_hit_separates_days(pool: PgPool) {
    let repo = PgStatsRepository::new(Arc::new(pool.clone()));
    let url_id = common::create_test_url(&pool, "https://example.com").await;
    let code = encode(url_id);

    repo.add_hit(&code, day(2024, 3, 19)).await.unwrap();
    repo.add_hit(&code, day(2024, 3, 20)).await.unwrap();
    repo.add_hit(&code, day(2024, 3, 20)).await.unwrap();

    assert_eq!(common::count_stats_rows(&pool, url_id).await, 2);
    assert_eq!(repo.total_hits(&code).await.unwrap(), 3);
}

#[sqlx::test]
async fn test_add_hit_refreshes_updated_at(pool: PgPool) {
    let repo = PgStatsRepository::new(Arc::new(pool.clone()));
    let url_id = common::create_test_url(&pool, "https://example.com").await;
    let code = encode(url_id);
    let today = Local::now().date_naive();

    repo.add_hit(&code, today).await.unwrap();
    sqlx::query("UPDATE url_stats SET updated_at = NOW() - INTERVAL '1 hour' WHERE url_id = $1")
        .bind(url_id)
        .execute(&pool)
        .await
        .unwrap();

    repo.add_hit(&code, today).await.unwrap();

    let rows = repo.last_7_days(&code, Local::now()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].hits, 2);
    assert!(rows[0].updated_at > rows[0].created_at);
}

#[sqlx::test]
async fn test_concurrent_hits_all_land(pool: PgPool) {
    let repo = Arc::new(PgStatsRepository::new(Arc::new(pool.clone())));
    let url_id = common::create_test_url(&pool, "https://example.com").await;
    let code = encode(url_id);
    let today = day(2024, 3, 20);

    let mut tasks = JoinSet::new();
    for _ in 0..50 {
        let repo = repo.clone();
        let code = code.clone();
        tasks.spawn(async move { repo.add_hit(&code, today).await });
    }

    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
    }

    assert_eq!(common::count_stats_rows(&pool, url_id).await, 1);
    assert_eq!(repo.total_hits(&code).await.unwrap(), 50);
}

#[sqlx::test]
async fn test_add_hit_unknown_url(pool: PgPool) {
    let repo = PgStatsRepository::new(Arc::new(pool));

    let result = repo.add_hit("zzzz", day(2024, 3, 20)).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
}

#[sqlx::test]
async fn test_add_hit_invalid_code(pool: PgPool) {
    let repo = PgStatsRepository::new(Arc::new(pool));

    let result = repo.add_hit("a-b", day(2024, 3, 20)).await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidCode { .. }));
}

#[sqlx::test]
async fn test_total_hits_without_rows(pool: PgPool) {
    let repo = PgStatsRepository::new(Arc::new(pool.clone()));
    let url_id = common::create_test_url(&pool, "https://example.com").await;

    assert_eq!(repo.total_hits(&encode(url_id)).await.unwrap(), 0);
}

#[sqlx::test]
async fn test_total_hits_invalid_code(pool: PgPool) {
    let repo = PgStatsRepository::new(Arc::new(pool));

    let result = repo.total_hits("").await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidCode { .. }));
}

#[sqlx::test]
async fn test_last_7_days_window_and_order(pool: PgPool) {
    let repo = PgStatsRepository::new(Arc::new(pool.clone()));
    let url_id = common::create_test_url(&pool, "https://example.com").await;

    common::create_test_hits(&pool, url_id, day(2024, 3, 20), 4).await;
    common::create_test_hits(&pool, url_id, day(2024, 3, 13), 9).await;
    common::create_test_hits(&pool, url_id, day(2024, 3, 14), 2).await;
    common::create_test_hits(&pool, url_id, day(2024, 3, 17), 1).await;

    let now = Local
        .with_ymd_and_hms(2024, 3, 20, 15, 30, 0)
        .earliest()
        .unwrap();
    let rows = repo.last_7_days(&encode(url_id), now).await.unwrap();

    let days: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
    assert_eq!(days, vec![day(2024, 3, 14), day(2024, 3, 17), day(2024, 3, 20)]);
    assert_eq!(rows.iter().map(|r| r.hits).sum::<i64>(), 7);
    assert!(rows.iter().all(|r| r.url_id == url_id));

    // The total still covers every day.
    assert_eq!(repo.total_hits(&encode(url_id)).await.unwrap(), 16);
}

#[sqlx::test]
async fn test_last_7_days_only_own_rows(pool: PgPool) {
    let repo = PgStatsRepository::new(Arc::new(pool.clone()));
    let first = common::create_test_url(&pool, "https://one.com").await;
    let second = common::create_test_url(&pool, "https://two.com").await;
    let today = Local::now().date_naive();

    common::create_test_hits(&pool, first, today, 3).await;
    common::create_test_hits(&pool, second, today, 5).await;

    let rows = repo.last_7_days(&encode(first), Local::now()).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].hits, 3);
}

#[sqlx::test]
async fn test_hit_worker_flushes_on_close(pool: PgPool) {
    let repo = Arc::new(PgStatsRepository::new(Arc::new(pool.clone())));
    let url_id = common::create_test_url(&pool, "https://example.com").await;
    let code = encode(url_id);
    let today = Local::now().date_naive();

    let (tx, rx) = mpsc::channel(100);
    let worker = tokio::spawn(run_hit_worker(rx, repo.clone(), HitWorkerOptions::default()));

    for _ in 0..20 {
        tx.send(HitEvent::new(code.clone(), today)).await.unwrap();
    }
    // An unknown link is logged and skipped.
    tx.send(HitEvent::new("zzzz".to_string(), today))
        .await
        .unwrap();
    drop(tx);

    worker.await.unwrap();

    assert_eq!(repo.total_hits(&code).await.unwrap(), 20);
}
