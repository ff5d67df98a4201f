//! Shared state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::ResolutionService;
use crate::domain::hit_event::HitEvent;
use crate::infrastructure::persistence::{PgStatsRepository, PgUrlRepository};

/// Resolution service wired to PostgreSQL.
pub type PgResolutionService = ResolutionService<PgUrlRepository, PgStatsRepository>;

#[derive(Clone)]
pub struct AppState {
    pub resolution_service: Arc<PgResolutionService>,
    /// Prepended to every emitted short link.
    pub prefix: Arc<str>,
}

impl AppState {
    /// Builds the repositories and the resolution service on top of `pool`.
    pub fn new(pool: Arc<PgPool>, hit_sender: mpsc::Sender<HitEvent>, prefix: &str) -> Self {
        let url_repository = Arc::new(PgUrlRepository::new(pool.clone()));
        let stats_repository = Arc::new(PgStatsRepository::new(pool));

        Self {
            resolution_service: Arc::new(ResolutionService::new(
                url_repository,
                stats_repository,
                hit_sender,
            )),
            prefix: Arc::from(prefix),
        }
    }
}
