//! Infrastructure layer for external integrations.
//!
//! Implements the store contract defined by the domain layer.
//!
//! - [`persistence`] - PostgreSQL and in-memory [`crate::domain::repositories::LinkRepository`] implementations

pub mod persistence;
