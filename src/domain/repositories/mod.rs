//! Repository trait definitions for the domain layer.
//!
//! Together these traits form the store contract: the only way the rest of the
//! service reads or mutates persisted records.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UrlRepository`] - Shortened URL lookup and creation
//! - [`StatsRepository`] - Daily hit counting and aggregation
//!
//! Both accept short codes rather than ids and decode them with
//! [`crate::utils::short_code::decode`]; an undecodable code fails with
//! [`crate::error::AppError::InvalidCode`] before any query runs.
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod stats_repository;
pub mod url_repository;

pub use stats_repository::StatsRepository;
pub use url_repository::UrlRepository;

#[cfg(test)]
pub use stats_repository::MockStatsRepository;
#[cfg(test)]
pub use url_repository::MockUrlRepository;
