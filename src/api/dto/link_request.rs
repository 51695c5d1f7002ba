//! Inbound request shapes understood by the dispatcher.

use axum::http::Method;
use std::string::FromUtf8Error;

/// Path that creates a short link instead of resolving one.
pub const SHORTEN_PATH: &str = "/shorten";

/// Query parameter carrying the long URL on [`SHORTEN_PATH`].
pub const URL_PARAM: &str = "url";

/// A request the dispatcher can act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRequest {
    /// `GET /shorten?url=<long url>`
    Shorten { url: String },
    /// `GET /<code>`
    Resolve { code: String },
    /// `GET /shorten?url=...` whose value is not percent-encoded UTF-8.
    MalformedUrl,
}

impl LinkRequest {
    /// Classifies a single-segment request.
    ///
    /// Returns `None` when the request can only be answered with `404`:
    /// a method other than `GET`, or `/shorten` without a `url` parameter.
    /// The `url` value is only extracted here; validation happens in the
    /// engine so that a bad value yields `422` instead of `404`.
    ///
    /// When `url` appears more than once the last occurrence wins. A value
    /// that decodes to invalid UTF-8 becomes [`LinkRequest::MalformedUrl`]
    /// instead of being repaired with replacement characters.
    pub fn parse(method: &Method, path: &str, query: Option<&str>) -> Option<Self> {
        if method != Method::GET {
            return None;
        }

        if path == SHORTEN_PATH {
            let raw = query?
                .split('&')
                .filter_map(|pair| {
                    let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                    (decode_component(key).ok()? == URL_PARAM).then_some(value)
                })
                .last()?;

            return Some(match decode_component(raw) {
                Ok(url) => Self::Shorten { url },
                Err(_) => Self::MalformedUrl,
            });
        }

        Some(Self::Resolve {
            code: path.trim_matches('/').to_string(),
        })
    }
}

/// Decodes one `application/x-www-form-urlencoded` component.
fn decode_component(raw: &str) -> Result<String, FromUtf8Error> {
    urlencoding::decode(&raw.replace('+', " ")).map(|decoded| decoded.into_owned())
}
