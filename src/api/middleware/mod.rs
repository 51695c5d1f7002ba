//! HTTP middleware: response headers and observability.

pub mod cors;
pub mod tracing;
