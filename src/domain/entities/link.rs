//! ShortLink entity representing a stored code → long URL mapping.

use chrono::{DateTime, Utc};

/// A persisted short link.
///
/// `code` is the natural key. `created_at` is assigned by the store on insert
/// and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ShortLink {
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(code: String, long_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            long_url,
            created_at,
        }
    }
}

/// Input data for inserting a new short link.
///
/// Only built by the engine after the URL has been normalized and the code
/// shape-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub long_url: String,
}

impl NewLink {
    pub fn new(code: impl Into<String>, long_url: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            long_url: long_url.into(),
        }
    }
}
