//! PostgreSQL implementation of the statistics repository.

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{UrlStats, histogram_start};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;
use crate::utils::db_error::is_foreign_key_violation;
use crate::utils::short_code;

#[derive(sqlx::FromRow)]
struct UrlStatsRow {
    id: i64,
    url_id: i64,
    date: NaiveDate,
    hits: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UrlStatsRow> for UrlStats {
    fn from(row: UrlStatsRow) -> Self {
        UrlStats {
            id: row.id,
            url_id: row.url_id,
            date: row.date,
            hits: row.hits,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL repository for daily hit counters.
///
/// Increments are a single upsert, so concurrent redirects of the same link on
/// the same day serialize on the `(url_id, date)` row inside PostgreSQL.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn add_hit(&self, code: &str, day: NaiveDate) -> Result<(), AppError> {
        let url_id = short_code::decode(code)?;

        sqlx::query(
            r#"
            INSERT INTO url_stats (url_id, date, hits)
            VALUES ($1, $2, 1)
            ON CONFLICT (url_id, date)
            DO UPDATE SET hits = url_stats.hits + 1, updated_at = NOW()
            "#,
        )
        .bind(url_id)
        .bind(day)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::not_found("Short link not found", json!({ "code": code }))
            } else {
                e.into()
            }
        })?;

        Ok(())
    }

    async fn total_hits(&self, code: &str) -> Result<i64, AppError> {
        let url_id = short_code::decode(code)?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(hits), 0)::BIGINT FROM url_stats WHERE url_id = $1",
        )
        .bind(url_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(total)
    }

    async fn last_7_days(
        &self,
        code: &str,
        now: DateTime<Local>,
    ) -> Result<Vec<UrlStats>, AppError> {
        let url_id = short_code::decode(code)?;

        let rows = sqlx::query_as::<_, UrlStatsRow>(
            r#"
            SELECT id, url_id, date, hits, created_at, updated_at
            FROM url_stats
            WHERE url_id = $1 AND date >= $2
            ORDER BY date ASC
            "#,
        )
        .bind(url_id)
        .bind(histogram_start(now))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(UrlStats::from).collect())
    }
}
