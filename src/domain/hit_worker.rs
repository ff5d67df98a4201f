//! Background worker that persists hit events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// Tuning knobs for [`run_hit_worker`].
#[derive(Debug, Clone, Copy)]
pub struct HitWorkerOptions {
    /// Maximum number of hits written concurrently.
    pub concurrency: usize,
    /// Retries after the first failed attempt, for transient store errors only.
    pub retry_attempts: usize,
}

impl Default for HitWorkerOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            retry_attempts: 3,
        }
    }
}

/// Consumes hit events until every sender is dropped.
///
/// Each event is written in its own task, at most `options.concurrency` at a time.
/// Once the channel closes the worker waits for in-flight writes before returning,
/// so awaiting it on shutdown flushes pending hits.
pub async fn run_hit_worker<S>(
    mut rx: mpsc::Receiver<HitEvent>,
    stats_repository: Arc<S>,
    options: HitWorkerOptions,
) where
    S: StatsRepository + 'static,
{
    let concurrency = options.concurrency.max(1);
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        while in_flight.len() >= concurrency {
            in_flight.join_next().await;
        }

        in_flight.spawn(record_hit(
            stats_repository.clone(),
            event,
            options.retry_attempts,
        ));
    }

    while in_flight.join_next().await.is_some() {}

    info!("Hit worker stopped");
}

/// Persists one hit, retrying transient store failures with jittered backoff.
///
/// Only failures raised before the upsert was sent are retried; anything later may
/// already be committed and would count the hit twice. Failures are logged and counted,
/// never propagated. Returns whether the hit landed.
pub async fn record_hit<S>(stats_repository: Arc<S>, event: HitEvent, retry_attempts: usize) -> bool
where
    S: StatsRepository + ?Sized,
{
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(retry_attempts);

    let result = RetryIf::start(
        strategy,
        || stats_repository.add_hit(&event.code, event.day),
        AppError::is_retryable,
    )
    .await;

    match result {
        Ok(()) => {
            metrics::counter!("urlshort_hits_recorded_total").increment(1);
            debug!(code = %event.code, day = %event.day, "Hit recorded");
            true
        }
        Err(e) => {
            metrics::counter!("urlshort_hits_failed_total").increment(1);
            error!(code = %event.code, day = %event.day, error = %e, "Failed to record hit");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockStatsRepository;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn test_worker_records_every_event() {
        let mut mock_repo = MockStatsRepository::new();
        mock_repo
            .expect_add_hit()
            .withf(|code, d| code == "abc" && *d == day())
            .times(5)
            .returning(|_, _| Ok(()));

        let (tx, rx) = mpsc::channel(16);
        let worker = tokio::spawn(run_hit_worker(
            rx,
            Arc::new(mock_repo),
            HitWorkerOptions::default(),
        ));

        for _ in 0..5 {
            tx.send(HitEvent::new("abc".to_string(), day())).await.unwrap();
        }
        drop(tx);

        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_with_single_slot() {
        let mut mock_repo = MockStatsRepository::new();
        mock_repo
            .expect_add_hit()
            .times(3)
            .returning(|_, _| Ok(()));

        let (tx, rx) = mpsc::channel(16);
        let options = HitWorkerOptions {
            concurrency: 1,
            retry_attempts: 0,
        };
        let worker = tokio::spawn(run_hit_worker(rx, Arc::new(mock_repo), options));

        for code in ["a", "b", "c"] {
            tx.send(HitEvent::new(code.to_string(), day())).await.unwrap();
        }
        drop(tx);

        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_record_hit_retries_unavailable_store() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_mock = calls.clone();

        let mut mock_repo = MockStatsRepository::new();
        mock_repo.expect_add_hit().times(3).returning(move |_, _| {
            if calls_in_mock.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(AppError::store_unavailable("Database unavailable", json!({})))
            } else {
                Ok(())
            }
        });

        let landed = record_hit(Arc::new(mock_repo), HitEvent::new("abc".into(), day()), 3).await;

        assert!(landed);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_record_hit_gives_up_after_retries() {
        let mut mock_repo = MockStatsRepository::new();
        mock_repo
            .expect_add_hit()
            .times(3)
            .returning(|_, _| {
                Err(AppError::store_unavailable("Database unavailable", json!({})))
            });

        let landed = record_hit(Arc::new(mock_repo), HitEvent::new("abc".into(), day()), 2).await;

        assert!(!landed);
    }

    #[tokio::test]
    async fn test_record_hit_does_not_retry_after_statement_sent() {
        let mut mock_repo = MockStatsRepository::new();
        mock_repo
            .expect_add_hit()
            .times(1)
            .returning(|_, _| Err(AppError::store("Database error", json!({}))));

        let landed = record_hit(Arc::new(mock_repo), HitEvent::new("abc".into(), day()), 3).await;

        assert!(!landed);
    }

    #[tokio::test]
    async fn test_record_hit_does_not_retry_missing_url() {
        let mut mock_repo = MockStatsRepository::new();
        mock_repo
            .expect_add_hit()
            .times(1)
            .returning(|_, _| Err(AppError::not_found("Short link not found", json!({}))));

        let landed = record_hit(Arc::new(mock_repo), HitEvent::new("zz".into(), day()), 3).await;

        assert!(!landed);
    }
}
