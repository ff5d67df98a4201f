//! URL entity representing a shortened link.

use chrono::{DateTime, Utc};

use crate::utils::short_code;

/// A shortened URL as persisted.
///
/// There is no `short` field: the externally visible code is computed from `id`
/// by [`Url::code`] whenever the record leaves the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    pub id: i64,
    pub original: String,
    pub created_at: DateTime<Utc>,
}

impl Url {
    /// Creates a new Url instance.
    pub fn new(id: i64, original: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            original,
            created_at,
        }
    }

    /// Short code naming this record.
    pub fn code(&self) -> String {
        short_code::encode(self.id)
    }

    /// Public short link, `{prefix}/links/{code}`.
    pub fn short_url(&self, prefix: &str) -> String {
        format!("{}/links/{}", prefix.trim_end_matches('/'), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_creation() {
        let now = Utc::now();
        let url = Url::new(1, "https://example.com".to_string(), now);

        assert_eq!(url.id, 1);
        assert_eq!(url.original, "https://example.com");
        assert_eq!(url.created_at, now);
    }

    #[test]
    fn test_code_is_derived_from_id() {
        let url = Url::new(125, "https://example.com".to_string(), Utc::now());
        assert_eq!(url.code(), "21");
        assert_eq!(short_code::decode(&url.code()), Ok(125));
    }

    #[test]
    fn test_short_url_without_prefix() {
        let id = short_code::decode("range").unwrap();
        let url = Url::new(id, "http://x.com".to_string(), Utc::now());
        assert_eq!(url.short_url(""), "/links/range");
    }

    #[test]
    fn test_short_url_with_prefix() {
        let url = Url::new(62, "http://x.com".to_string(), Utc::now());
        assert_eq!(url.short_url("https://s.test.com"), "https://s.test.com/links/10");
        assert_eq!(url.short_url("https://s.test.com/"), "https://s.test.com/links/10");
    }
}
