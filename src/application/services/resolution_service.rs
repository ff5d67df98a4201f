//! Shorten, redirect and stats use cases.

use std::sync::Arc;

use chrono::Local;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::entities::{Url, UrlStats};
use crate::domain::hit_event::HitEvent;
use crate::domain::hit_worker::{HitWorkerOptions, record_hit};
use crate::domain::repositories::{StatsRepository, UrlRepository};
use crate::error::AppError;
use crate::utils::short_code::validate_custom_alias;
use crate::utils::url_validator::validate_original_url;

/// Result of a shorten request.
///
/// All variants carry the record the caller should report. Only [`Self::Duplicate`]
/// is surfaced as a client error; the record is returned anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortenOutcome {
    /// A new record was created.
    Created(Url),
    /// The requested custom alias already names this same original URL.
    Matched(Url),
    /// The original URL was shortened before; this is its existing record.
    Duplicate(Url),
}

impl ShortenOutcome {
    pub fn url(&self) -> &Url {
        match self {
            Self::Created(url) | Self::Matched(url) | Self::Duplicate(url) => url,
        }
    }

    pub fn into_url(self) -> Url {
        match self {
            Self::Created(url) | Self::Matched(url) | Self::Duplicate(url) => url,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

/// Aggregated statistics of one short link.
#[derive(Debug, Clone)]
pub struct StatsReport {
    pub url: Url,
    pub total: i64,
    /// Day rows of the last seven days, oldest first.
    pub histogram: Vec<UrlStats>,
}

/// Orchestrates the store for the three public use cases.
///
/// Owns no state besides its collaborators: both repositories and the sending half
/// of the hit queue are passed in at construction.
pub struct ResolutionService<U: UrlRepository, S: StatsRepository> {
    url_repository: Arc<U>,
    stats_repository: Arc<S>,
    hit_sender: mpsc::Sender<HitEvent>,
}

impl<U, S> ResolutionService<U, S>
where
    U: UrlRepository,
    S: StatsRepository + 'static,
{
    /// Creates a new resolution service.
    pub fn new(
        url_repository: Arc<U>,
        stats_repository: Arc<S>,
        hit_sender: mpsc::Sender<HitEvent>,
    ) -> Self {
        Self {
            url_repository,
            stats_repository,
            hit_sender,
        }
    }

    /// Shortens `original`, optionally under a caller-chosen alias.
    ///
    /// # Policy
    ///
    /// 1. `original` must be a non-empty `http://` or `https://` URL
    /// 2. An already shortened `original` yields [`ShortenOutcome::Duplicate`], unless the
    ///    requested alias is exactly its code, which yields [`ShortenOutcome::Matched`].
    ///    The alias is not validated in this case
    /// 3. The alias must be a valid canonical short code
    /// 4. An alias already naming the same `original` yields [`ShortenOutcome::Matched`]
    /// 5. Otherwise a record is created under the alias or a store-assigned id
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an unusable URL or alias.
    /// Returns [`AppError::Conflict`] if the alias names a different URL.
    /// Returns [`AppError::Store`] on database errors.
    pub async fn shorten(
        &self,
        original: String,
        custom: Option<String>,
    ) -> Result<ShortenOutcome, AppError> {
        validate_original_url(&original)?;

        if let Some(existing) = self.url_repository.find_by_original(&original).await? {
            let requested_id = custom
                .as_deref()
                .and_then(|alias| validate_custom_alias(alias).ok());
            return Ok(classify_existing(existing, requested_id));
        }

        let custom_id = custom.as_deref().map(validate_custom_alias).transpose()?;

        let created = match custom.as_deref() {
            Some(alias) => {
                if let Some(taken) = self.url_repository.find_by_short(alias).await? {
                    if taken.original == original {
                        return Ok(ShortenOutcome::Matched(taken));
                    }
                    return Err(alias_taken(alias));
                }

                self.url_repository.insert_custom(&original, alias).await
            }
            None => self.url_repository.insert(&original).await,
        };

        match created {
            Ok(url) => {
                info!(code = %url.code(), "Short link created");
                Ok(ShortenOutcome::Created(url))
            }
            Err(AppError::Conflict { .. }) => {
                self.resolve_insert_race(&original, custom.as_deref(), custom_id)
                    .await
            }
            Err(e) => Err(e),
        }
    }

    /// A concurrent request won the insert. Report whatever it created.
    async fn resolve_insert_race(
        &self,
        original: &str,
        alias: Option<&str>,
        custom_id: Option<i64>,
    ) -> Result<ShortenOutcome, AppError> {
        debug!(url = %original, "Insert lost a race, re-reading");

        match self.url_repository.find_by_original(original).await? {
            Some(existing) => Ok(classify_existing(existing, custom_id)),
            None => Err(match alias {
                Some(alias) => alias_taken(alias),
                None => AppError::conflict(
                    "Short link could not be created",
                    json!({ "url": original }),
                ),
            }),
        }
    }

    /// Looks up the record named by `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCode`] if `code` does not decode.
    /// Returns [`AppError::NotFound`] if no record matches.
    /// Returns [`AppError::Store`] on database errors.
    pub async fn resolve(&self, code: &str) -> Result<Url, AppError> {
        self.url_repository
            .find_by_short(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Resolves `code` for a redirect and schedules a hit for today.
    ///
    /// The hit is recorded in the background; its outcome never affects the result.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`]. No hit is recorded when resolution fails.
    pub async fn redirect(&self, code: &str) -> Result<Url, AppError> {
        let url = self.resolve(code).await?;

        self.dispatch_hit(HitEvent::today(url.code()));

        Ok(url)
    }

    /// Queues a hit, or writes it from a detached task when the queue is full or closed.
    fn dispatch_hit(&self, event: HitEvent) {
        if let Err(e) = self.hit_sender.try_send(event) {
            let event = e.into_inner();
            warn!(code = %event.code, "Hit queue unavailable, recording hit directly");

            let stats_repository = self.stats_repository.clone();
            tokio::spawn(async move {
                record_hit(
                    stats_repository,
                    event,
                    HitWorkerOptions::default().retry_attempts,
                )
                .await;
            });
        }
    }

    /// Builds the stats report of `code`.
    ///
    /// The record, the total and the histogram are fetched concurrently; the first
    /// failure aborts the report.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] whatever the failing lookup was, including an
    /// undecodable or unknown code. The cause is logged.
    pub async fn stats(&self, code: &str) -> Result<StatsReport, AppError> {
        let (url, total, histogram) = tokio::try_join!(
            self.resolve(code),
            self.stats_repository.total_hits(code),
            self.stats_repository.last_7_days(code, Local::now()),
        )
        .map_err(|e| aggregation_failed(code, e))?;

        Ok(StatsReport {
            url,
            total,
            histogram,
        })
    }

    /// Checks that the store answers.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.url_repository.ping().await
    }

    /// Returns true once the hit worker has stopped receiving.
    pub fn hit_queue_closed(&self) -> bool {
        self.hit_sender.is_closed()
    }

    /// Free slots in the hit queue.
    pub fn hit_queue_capacity(&self) -> usize {
        self.hit_sender.capacity()
    }
}

fn classify_existing(existing: Url, custom_id: Option<i64>) -> ShortenOutcome {
    if custom_id == Some(existing.id) {
        ShortenOutcome::Matched(existing)
    } else {
        debug!(code = %existing.code(), "URL already shortened");
        ShortenOutcome::Duplicate(existing)
    }
}

fn aggregation_failed(code: &str, cause: AppError) -> AppError {
    warn!(code = %code, error = %cause, "Stats aggregation failed");

    match cause {
        AppError::Store { .. } => cause,
        _ => AppError::store(
            "Could not build stats report",
            json!({ "code": code, "reason": cause.to_string() }),
        ),
    }
}

fn alias_taken(alias: &str) -> AppError {
    AppError::conflict(
        "Custom alias is already taken by a different URL",
        json!({ "alias": alias }),
    )
}
