//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx runtime
//! queries mapped through `FromRow` structs.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - URL records, code lookup and id allocation
//! - [`PgStatsRepository`] - Daily hit counters and aggregation

pub mod pg_stats_repository;
pub mod pg_url_repository;

pub use pg_stats_repository::PgStatsRepository;
pub use pg_url_repository::PgUrlRepository;
