//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

use crate::domain::entities::Url;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::db_error::{URLS_ORIGINAL_KEY, URLS_PKEY, is_unique_violation_on};
use crate::utils::short_code;

/// Attempts of an auto-id insert before giving up on primary key collisions.
const MAX_INSERT_ATTEMPTS: usize = 10;

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: i64,
    original: String,
    created_at: DateTime<Utc>,
}

impl From<UrlRow> for Url {
    fn from(row: UrlRow) -> Self {
        Url::new(row.id, row.original, row.created_at)
    }
}

/// PostgreSQL repository for URL records.
///
/// Short codes never hit the database: they are decoded to ids before any query.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn find_by_original(&self, original: &str) -> Result<Option<Url>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, original, created_at
            FROM urls
            WHERE original_hash = sha256(convert_to($1, 'UTF8')) AND original = $1
            "#,
        )
        .bind(original)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Url::from))
    }

    async fn find_by_short(&self, code: &str) -> Result<Option<Url>, AppError> {
        let id = short_code::decode(code)?;

        let row =
            sqlx::query_as::<_, UrlRow>("SELECT id, original, created_at FROM urls WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(Url::from))
    }

    async fn insert(&self, original: &str) -> Result<Url, AppError> {
        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let result = sqlx::query_as::<_, UrlRow>(
                r#"
                INSERT INTO urls (original)
                VALUES ($1)
                RETURNING id, original, created_at
                "#,
            )
            .bind(original)
            .fetch_one(self.pool.as_ref())
            .await;

            match result {
                Ok(row) => return Ok(row.into()),
                // The sequence handed out an id already claimed by a custom alias.
                Err(e) if is_unique_violation_on(&e, URLS_PKEY) => {
                    warn!(attempt, "Generated id already taken, retrying");
                }
                Err(e) if is_unique_violation_on(&e, URLS_ORIGINAL_KEY) => {
                    return Err(already_shortened(original));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::store(
            "Could not allocate a short code",
            json!({ "attempts": MAX_INSERT_ATTEMPTS }),
        ))
    }

    async fn insert_custom(&self, original: &str, code: &str) -> Result<Url, AppError> {
        let id = short_code::decode(code)?;

        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (id, original)
            VALUES ($1, $2)
            RETURNING id, original, created_at
            "#,
        )
        .bind(id)
        .bind(original)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, URLS_PKEY) {
                AppError::conflict("Short code already taken", json!({ "code": code }))
            } else if is_unique_violation_on(&e, URLS_ORIGINAL_KEY) {
                already_shortened(original)
            } else {
                e.into()
            }
        })?;

        Ok(row.into())
    }

    async fn update(&self, url: &Url) -> Result<Url, AppError> {
        // id, original and created_at are all immutable, so the row is rewritten as stored.
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            UPDATE urls
            SET original = $2
            WHERE id = $1 AND original = $2
            RETURNING id, original, created_at
            "#,
        )
        .bind(url.id)
        .bind(&url.original)
        .fetch_optional(self.pool.as_ref())
        .await?;

        if let Some(row) = row {
            return Ok(row.into());
        }

        let stored: Option<String> =
            sqlx::query_scalar("SELECT original FROM urls WHERE id = $1")
                .bind(url.id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        match stored {
            None => Err(AppError::not_found(
                "Short link not found",
                json!({ "code": url.code() }),
            )),
            Some(_) => Err(AppError::bad_request(
                "Original URL cannot be changed",
                json!({ "code": url.code() }),
            )),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(())
    }
}

fn already_shortened(original: &str) -> AppError {
    AppError::conflict("URL already shortened", json!({ "url": original }))
}
