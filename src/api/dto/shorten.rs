//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Url;

/// Request to shorten a URL.
///
/// Both fields are checked by the resolution service, since an alias is only
/// validated when the URL has not been shortened before.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    /// The original URL (must start with `http://` or `https://`).
    pub url: String,

    /// Optional caller-chosen short code.
    pub custom: Option<String>,
}

/// A shortened link as reported to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub original: String,
    pub short: String,
    pub created_at: DateTime<Utc>,
}

impl ShortenResponse {
    pub fn from_url(url: Url, prefix: &str) -> Self {
        Self {
            short: url.short_url(prefix),
            original: url.original,
            created_at: url.created_at,
        }
    }
}
