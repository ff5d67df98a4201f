//! Hit event model for asynchronous hit recording.

use chrono::{Local, NaiveDate};

/// A redirect waiting to be counted.
///
/// Sent from the redirect path to the background worker over a channel, so the
/// redirect response never waits on the statistics write.
///
/// # Usage Flow
///
/// 1. Created by [`crate::application::services::ResolutionService::redirect`]
/// 2. Sent to channel (non-blocking)
/// 3. Processed by [`crate::domain::hit_worker::run_hit_worker`]
/// 4. Persisted via [`crate::domain::repositories::StatsRepository::add_hit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitEvent {
    pub code: String,
    /// Local calendar day of the redirect.
    pub day: NaiveDate,
}

impl HitEvent {
    pub fn new(code: String, day: NaiveDate) -> Self {
        Self { code, day }
    }

    /// A hit on `code` at the current local day.
    pub fn today(code: String) -> Self {
        Self::new(code, Local::now().date_naive())
    }
}
