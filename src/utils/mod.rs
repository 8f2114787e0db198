//! Utility functions and helpers.

pub mod http;
#[cfg(test)]
pub(crate) mod test_server;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Make `href` absolute against `base`.
///
/// Empty and already absolute values are returned untouched so the stored
/// URL matches the markup byte for byte.
pub fn absolute_url(base: &Url, href: &str) -> String {
    if href.is_empty() || Url::parse(href).is_ok() {
        return href.to_string();
    }
    resolve_url(base, href)
}

/// Decode a query-escaped string (`%XX` sequences and `+` for space).
///
/// Input that does not decode to UTF-8 is returned unchanged, `+` included.
pub fn query_unescape(s: &str) -> String {
    match urlencoding::decode(&s.replace('+', " ")) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => s.to_string(),
    }
}
