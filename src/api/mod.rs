//! HTTP layer: request classification, dispatch and response rendering.
//!
//! # Modules
//!
//! - [`dto`] - Request variants and response bodies
//! - [`handlers`] - The dispatcher and the health check
//! - [`middleware`] - CORS headers and request tracing

pub mod dto;
pub mod handlers;
pub mod middleware;
