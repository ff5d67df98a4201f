//! Repository trait for shortened URL records.

use crate::domain::entities::Url;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for shortened URLs.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds the record whose original URL is exactly `original`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    async fn find_by_original(&self, original: &str) -> Result<Option<Url>, AppError>;

    /// Finds the record named by a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Url))` if found
    /// - `Ok(None)` if no record has the decoded id
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCode`] if `code` does not decode; the database is not queried.
    /// Returns [`AppError::Store`] on database errors.
    async fn find_by_short(&self, code: &str) -> Result<Option<Url>, AppError>;

    /// Creates a record with a store-assigned id.
    ///
    /// The short code of the new record is [`Url::code`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `original` is already shortened.
    /// Returns [`AppError::Store`] on database errors.
    async fn insert(&self, original: &str) -> Result<Url, AppError>;

    /// Creates a record whose id is the decoded value of `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCode`] if `code` does not decode.
    /// Returns [`AppError::Conflict`] if the id is taken or `original` is already shortened.
    /// Returns [`AppError::Store`] on database errors.
    async fn insert_custom(&self, original: &str, code: &str) -> Result<Url, AppError>;

    /// Writes back an existing record and returns it as stored.
    ///
    /// `id` and `original` identify the record; neither they nor `created_at` are changed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has `url.id`.
    /// Returns [`AppError::Validation`] if `url.original` differs from the stored value.
    /// Returns [`AppError::Store`] on database errors.
    async fn update(&self, url: &Url) -> Result<Url, AppError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if the database cannot be queried.
    async fn ping(&self) -> Result<(), AppError>;
}
