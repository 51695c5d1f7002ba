//! HTTP request handlers.

pub mod dispatch;
pub mod health;

pub use dispatch::{dispatch_handler, not_found_handler};
pub use health::health_handler;
