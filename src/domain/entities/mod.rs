//! Core domain entities.
//!
//! - [`ShortLink`] - A stored code → long URL mapping
//! - [`NewLink`] - Input for inserting a mapping

pub mod link;

pub use link::{NewLink, ShortLink};
