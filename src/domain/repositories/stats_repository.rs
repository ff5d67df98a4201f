//! Repository trait for daily hit statistics.

use crate::domain::entities::UrlStats;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate};

/// Repository interface for per-day redirect counters.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_stats.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Counts one redirect of `code` on `day`.
    ///
    /// Creates the `(url, day)` row with one hit, or increments it. Concurrent calls
    /// for the same pair all land; none is lost and no duplicate row is created.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCode`] if `code` does not decode.
    /// Returns [`AppError::NotFound`] if no URL has the decoded id.
    /// Returns [`AppError::Store`] on database errors.
    async fn add_hit(&self, code: &str, day: NaiveDate) -> Result<(), AppError>;

    /// Sums hits over every day. Zero when the URL was never visited.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCode`] if `code` does not decode.
    /// Returns [`AppError::Store`] on database errors.
    async fn total_hits(&self, code: &str) -> Result<i64, AppError>;

    /// Returns the day rows of the last seven days up to `now`, oldest first.
    ///
    /// See [`crate::domain::entities::histogram_start`] for the window boundary.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCode`] if `code` does not decode.
    /// Returns [`AppError::Store`] on database errors.
    async fn last_7_days(
        &self,
        code: &str,
        now: DateTime<Local>,
    ) -> Result<Vec<UrlStats>, AppError>;
}
