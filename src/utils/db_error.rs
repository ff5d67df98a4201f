//! Classification of PostgreSQL constraint violations.

/// Primary key of `urls`; violated when an id is already taken.
pub const URLS_PKEY: &str = "urls_pkey";

/// Unique constraint on the digest of `urls.original`.
pub const URLS_ORIGINAL_KEY: &str = "urls_original_key";

/// Returns `true` if `e` is a unique violation of the named constraint.
pub fn is_unique_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.constraint() == Some(constraint)
}

/// Returns `true` if `e` is a foreign key violation (a stats row for a missing url).
pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}
