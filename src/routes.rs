//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /health`   - Store health check
//! - `*   /`         - Dispatcher (empty code, answered with 422)
//! - `*   /{segment}` - Dispatcher: `/shorten?url=...` creates, anything else resolves
//! - everything else - 404 with empty body
//!
//! Only single-segment paths reach the dispatcher. `/abc/def` and `/abc/`
//! fall through to the 404 fallback.
//!
//! # Middleware
//!
//! - **Headers** - Permissive CORS and default JSON content type on every response
//! - **Tracing** - Structured request/response logging

use crate::api::handlers::{dispatch_handler, health_handler, not_found_handler};
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::{any, get};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health_handler).fallback(not_found_handler))
        .route("/", any(dispatch_handler))
        .route("/{segment}", any(dispatch_handler))
        .fallback(not_found_handler)
        .with_state(state);

    cors::apply(router).layer(tracing::layer())
}
