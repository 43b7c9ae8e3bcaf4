//! Header construction for upstream requests and gateway responses.
//!
//! [`passthrough_request_headers`] keeps the client's headers but strips
//! hop-by-hop headers and `Host`, and asks the origin for an identity
//! encoded body so documents can be rewritten. [`api_request_headers`]
//! builds the fixed header set API calls are sent with. The response
//! helpers strip hop-by-hop and content security policy headers.

use std::sync::LazyLock;

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Desktop browser user agent sent on API calls; the origin varies its
/// responses by user agent.
pub const API_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.163 Safari/537.36";

pub const API_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

pub const ALLOWED_METHODS: &str = "GET, HEAD, POST, PUT, OPTIONS";

static HOP_BY_HOP: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    [
        "connection",
        "keep-alive",
        "transfer-encoding",
        "te",
        "trailer",
        "upgrade",
        "proxy-authorization",
        "proxy-authenticate",
    ]
    .iter()
    .filter_map(|name| name.parse::<HeaderName>().ok())
    .collect()
});

static CSP_HEADERS: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    ["content-security-policy", "x-content-security-policy"]
        .iter()
        .filter_map(|name| name.parse::<HeaderName>().ok())
        .collect()
});

pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
}

/// Strip content security policies so the injected script may run.
pub fn strip_content_security_policy(headers: &mut HeaderMap) {
    for name in CSP_HEADERS.iter() {
        headers.remove(name);
    }
}

/// Client headers for a passthrough request.
///
/// `Host` is dropped so the HTTP client derives it from the upstream
/// URI, and `accept-encoding` is pinned to identity: compressed HTML
/// cannot be rewritten in flight.
#[must_use]
pub fn passthrough_request_headers(original: &HeaderMap) -> HeaderMap {
    let mut headers = original.clone();
    strip_hop_by_hop(&mut headers);
    headers.remove(header::HOST);
    headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("identity"));
    headers
}

#[must_use]
pub fn api_request_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(API_CONTENT_TYPE),
    );
    headers.insert(header::USER_AGENT, HeaderValue::from_static(API_USER_AGENT));
    headers
}

#[must_use]
pub fn asset_request_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("identity"));
    headers
}

/// True when the three headers of a CORS preflight are all present.
#[must_use]
pub fn is_cors_preflight(headers: &HeaderMap) -> bool {
    headers.contains_key(header::ORIGIN)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_HEADERS)
}

#[must_use]
pub fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().to_ascii_lowercase().starts_with("text/html"))
}

/// True when the body is not content-encoded (or explicitly identity).
#[must_use]
pub fn is_identity_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map_or(true, |v| v.trim().eq_ignore_ascii_case("identity"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_strips_hop_by_hop_and_host() {
        let mut original = HeaderMap::new();
        original.insert("connection", "keep-alive".parse().unwrap());
        original.insert("host", "example.com".parse().unwrap());
        original.insert("cookie", "a=b".parse().unwrap());
        original.insert("accept-encoding", "gzip, br".parse().unwrap());

        let result = passthrough_request_headers(&original);

        assert!(result.get("connection").is_none());
        assert!(result.get("host").is_none());
        assert_eq!(result.get("cookie").unwrap(), "a=b");
        assert_eq!(result.get("accept-encoding").unwrap(), "identity");
    }

    #[test]
    fn api_headers_are_fixed() {
        let headers = api_request_headers();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("content-type").unwrap(), API_CONTENT_TYPE);
        assert_eq!(headers.get("user-agent").unwrap(), API_USER_AGENT);
    }

    #[test]
    fn strips_both_csp_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("content-security-policy", "default-src 'self'".parse().unwrap());
        headers.insert("x-content-security-policy", "default-src 'self'".parse().unwrap());
        headers.insert("cache-control", "no-cache".parse().unwrap());

        strip_content_security_policy(&mut headers);

        assert_eq!(headers.len(), 1);
        assert!(headers.get("cache-control").is_some());
    }

    #[test]
    fn preflight_needs_all_three_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("origin", "https://a.com".parse().unwrap());
        headers.insert("access-control-request-method", "POST".parse().unwrap());
        assert!(!is_cors_preflight(&headers));

        headers.insert("access-control-request-headers", "content-type".parse().unwrap());
        assert!(is_cors_preflight(&headers));
    }

    #[test]
    fn detects_html_and_encoding() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "Text/HTML; charset=utf-8".parse().unwrap());
        assert!(is_html(&headers));
        assert!(is_identity_encoded(&headers));

        headers.insert("content-encoding", "gzip".parse().unwrap());
        assert!(!is_identity_encoded(&headers));

        headers.insert("content-type", "application/json".parse().unwrap());
        assert!(!is_html(&headers));
    }
}
