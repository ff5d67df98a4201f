//! Utility functions shared across layers.
//!
//! - [`short_code`] - Base62 codec between record ids and short codes
//! - [`url_validator`] - Scheme check for submitted URLs
//! - [`db_error`] - PostgreSQL constraint violation helpers

pub mod db_error;
pub mod short_code;
pub mod url_validator;
