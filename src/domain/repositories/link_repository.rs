//! Repository trait for short link data access.

use crate::domain::entities::{NewLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Persistence gateway for short links, keyed by code.
///
/// Implementations must enforce code uniqueness themselves (a primary key in
/// PostgreSQL, an occupied-slot check in memory). The engine's lookup before
/// insert is only an optimisation; the constraint is what prevents two
/// concurrent inserts from sharing a code.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - Process-local map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on store errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Inserts a new link and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already taken.
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on store errors.
    async fn insert(&self, new_link: NewLink) -> Result<ShortLink, AppError>;

    /// Replaces the long URL of an existing link. `code` and `created_at` are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    async fn update(&self, code: &str, long_url: &str) -> Result<ShortLink, AppError>;

    /// Deletes a link by code.
    ///
    /// Returns `Ok(true)` if a link was removed, `Ok(false)` if none existed.
    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError>;

    /// Counts stored links.
    async fn count(&self) -> Result<i64, AppError>;
}
