//! Request and response shapes for the HTTP layer.

pub mod health;
pub mod link_request;

pub use link_request::LinkRequest;
