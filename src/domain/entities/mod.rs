//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`Url`] - A shortened URL; its short code is derived from the id, never stored
//! - [`UrlStats`] - Redirect count of one URL on one local calendar day
//!
//! Entities are plain data. The only logic they carry is derived views such as
//! [`Url::code`] and the day-bucket arithmetic in [`url_stats`].

pub mod url;
pub mod url_stats;

pub use url::Url;
pub use url_stats::{UrlStats, histogram_start};
