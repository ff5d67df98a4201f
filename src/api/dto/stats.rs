//! DTOs for link statistics.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::StatsReport;
use crate::domain::entities::UrlStats;

/// Statistics of a single short link.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub original: String,
    pub short: String,
    /// Hits over the whole lifetime of the link.
    pub total: i64,
    /// Days with at least one hit in the last seven days, oldest first.
    pub histogram: Vec<DailyHits>,
    pub created_at: DateTime<Utc>,
}

/// Hit count of one day.
#[derive(Debug, Serialize, Deserialize)]
pub struct DailyHits {
    pub date: NaiveDate,
    pub hits: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UrlStats> for DailyHits {
    fn from(stats: UrlStats) -> Self {
        Self {
            date: stats.date,
            hits: stats.hits,
            created_at: stats.created_at,
            updated_at: stats.updated_at,
        }
    }
}

impl StatsResponse {
    pub fn from_report(report: StatsReport, prefix: &str) -> Self {
        Self {
            short: report.url.short_url(prefix),
            original: report.url.original,
            total: report.total,
            histogram: report.histogram.into_iter().map(DailyHits::from).collect(),
            created_at: report.url.created_at,
        }
    }
}
