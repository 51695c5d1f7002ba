//! Domain layer: the persisted entity and the store contract.
//!
//! # Architecture
//!
//! - [`entities`] - [`entities::ShortLink`] and its creation input
//! - [`repositories`] - The [`repositories::LinkRepository`] store trait
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Concrete stores live in [`crate::infrastructure::persistence`] and
//! the orchestration logic in [`crate::application::services`].

pub mod entities;
pub mod repositories;
