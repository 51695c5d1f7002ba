//! Shape checks for short codes and long URLs.
//!
//! Pure functions with no I/O. Both the create and the resolve path run their
//! input through here before the store is consulted.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Exact length of every short code.
pub const CODE_LENGTH: usize = 8;

/// Maximum accepted long URL length, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

/// Scheme prepended to URLs submitted without one.
pub const DEFAULT_SCHEME_PREFIX: &str = "http://";

static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{8}$").expect("code regex is valid"));

/// Leading `scheme:` plus whatever follows it up to the first `/`, `?` or `#`.
static SCHEME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:([^/?#]*)").expect("scheme regex is valid")
});

/// Reasons a long URL is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlRejection {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL is {length} characters long (max {max})", max = MAX_URL_LENGTH)]
    TooLong { length: usize },
}

/// A long URL that passed validation and carries an explicit scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns true iff `code` is exactly [`CODE_LENGTH`] ASCII alphanumerics.
///
/// # Examples
///
/// ```
/// use short_url::utils::validator::validate_code;
///
/// assert!(validate_code("Ab3dE5gH"));
/// assert!(!validate_code("Ak3"));
/// assert!(!validate_code("abc-efgh"));
/// ```
pub fn validate_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

/// Validates a long URL and prepends `http://` when it has no scheme.
///
/// Length is counted in characters, before the prefix is added. URLs that
/// already carry a scheme are returned unchanged, including schemes without
/// an authority part such as `mailto:` or `tel:`. `host:port` input is not
/// mistaken for a scheme.
///
/// # Errors
///
/// - [`UrlRejection::Empty`] for an empty string
/// - [`UrlRejection::TooLong`] above [`MAX_URL_LENGTH`] characters
///
/// # Examples
///
/// ```
/// use short_url::utils::validator::validate_and_normalize_long_url;
///
/// let url = validate_and_normalize_long_url("x.com").unwrap();
/// assert_eq!(url.as_str(), "http://x.com");
///
/// let url = validate_and_normalize_long_url("https://x.com/a?b=c").unwrap();
/// assert_eq!(url.as_str(), "https://x.com/a?b=c");
/// ```
pub fn validate_and_normalize_long_url(url: &str) -> Result<NormalizedUrl, UrlRejection> {
    if url.is_empty() {
        return Err(UrlRejection::Empty);
    }

    let length = url.chars().count();
    if length > MAX_URL_LENGTH {
        return Err(UrlRejection::TooLong { length });
    }

    if has_scheme(url) {
        Ok(NormalizedUrl(url.to_string()))
    } else {
        Ok(NormalizedUrl(format!("{DEFAULT_SCHEME_PREFIX}{url}")))
    }
}

/// `mailto:a@b.com`, `urn:isbn:1` and `https://x.com` carry a scheme.
/// `localhost:8080/x` does not: a run of digits after the colon is a port.
fn has_scheme(url: &str) -> bool {
    match SCHEME_REGEX.captures(url) {
        Some(caps) => {
            let after_colon = &caps[1];
            after_colon.is_empty() || !after_colon.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}
