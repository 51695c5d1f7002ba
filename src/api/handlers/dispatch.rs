//! Request dispatcher for the shorten and resolve endpoints.

use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::{debug, error};
use url::Url;

use crate::api::dto::LinkRequest;
use crate::domain::entities::ShortLink;
use crate::error::AppError;
use crate::state::{AppState, DynLinkService};

/// Content type of a successful shorten response.
pub const SHORTEN_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

/// Serves every single-segment path.
///
/// # Endpoints
///
/// - `GET /shorten?url=<long url>` - 200 with the JSON-encoded code
/// - `GET /{code}` - 302 to the stored URL, JSON-encoded URL as body
///
/// # Response Codes
///
/// - **422**: malformed code, empty or over-long URL; body `{"error":"Invalid input"}`
/// - **404**: unknown code, missing `url` parameter, or a method other than `GET`; empty body
/// - **5xx**: store failures, exhausted code generation, failed read-back
pub async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Response {
    match LinkRequest::parse(&method, uri.path(), uri.query()) {
        Some(request) => dispatch(&state.link_service, request).await,
        None => {
            debug!(%method, path = uri.path(), "Unroutable request");
            AppError::not_found("No such route", json!({ "path": uri.path() })).into_response()
        }
    }
}

/// Answers multi-segment paths, which never reach the dispatcher.
pub async fn not_found_handler(uri: Uri) -> Response {
    debug!(path = uri.path(), "Rejected at edge");
    AppError::not_found("No such route", json!({ "path": uri.path() })).into_response()
}

/// Runs a classified request through the engine and renders the outcome.
pub async fn dispatch(service: &DynLinkService, request: LinkRequest) -> Response {
    let result = match request {
        LinkRequest::Shorten { url } => service
            .create_short_link(&url)
            .await
            .map(|link| shortened_response(&link)),
        LinkRequest::Resolve { code } => service
            .resolve_short_link(&code)
            .await
            .and_then(|link| redirect_response(&link)),
        LinkRequest::MalformedUrl => Err(AppError::bad_request(
            "Invalid long URL",
            json!({ "reason": "URL is not valid UTF-8" }),
        )),
    };

    result.unwrap_or_else(|err| {
        if err.is_fatal() {
            error!(error = %err, "Request failed");
        } else {
            debug!(error = %err, "Request rejected");
        }
        err.into_response()
    })
}

fn shortened_response(link: &ShortLink) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, SHORTEN_CONTENT_TYPE)],
        Value::from(link.code.as_str()).to_string(),
    )
        .into_response()
}

fn redirect_response(link: &ShortLink) -> Result<Response, AppError> {
    let location = location_header(&link.long_url)?;

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, location)],
        Value::from(link.long_url.as_str()).to_string(),
    )
        .into_response())
}

/// Builds a `Location` value for a stored URL.
///
/// Stored URLs are emitted verbatim when they are valid header bytes. URLs
/// carrying non-ASCII text are re-serialized through the URL parser, which
/// punycodes the host and percent-encodes the rest.
fn location_header(long_url: &str) -> Result<HeaderValue, AppError> {
    if let Ok(value) = HeaderValue::from_str(long_url) {
        return Ok(value);
    }

    Url::parse(long_url)
        .ok()
        .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        .ok_or_else(|| {
            AppError::internal(
                "Stored URL cannot be used as a redirect target",
                json!({ "long_url": long_url }),
            )
        })
}
