//! Permissive CORS and default content-type headers.
//!
//! Every response, including edge 404s, carries the same header set. The
//! dispatcher's own `Content-Type` (e.g. `text/plain` for shorten) wins over
//! the JSON default.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, header};
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET";
pub const MAX_AGE_SECONDS: &str = "3600";
pub const ALLOW_HEADERS: &str =
    "Content-Type, Access-Control-Allow-Headers, Authorization, X-Requested-With";
pub const DEFAULT_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Wraps `router` with the response header layers.
pub fn apply<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            ALLOW_ORIGIN,
        ))
        .layer(overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            ALLOW_METHODS,
        ))
        .layer(overriding(header::ACCESS_CONTROL_MAX_AGE, MAX_AGE_SECONDS))
        .layer(overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            ALLOW_HEADERS,
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_TYPE,
            HeaderValue::from_static(DEFAULT_CONTENT_TYPE),
        ))
}

fn overriding(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}
