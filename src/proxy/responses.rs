//! Responses the gateway answers itself, without contacting the origin.

use axum::body::Body;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use super::headers::{is_cors_preflight, ALLOWED_METHODS};
use crate::config::model::DomainConfig;
use crate::error::GatewayError;

pub const NOT_FOUND_BODY: &str = "Domain not found in configuration";

#[must_use]
pub fn robots_txt(config: &DomainConfig) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain;charset=UTF-8")],
        format!("Sitemap: https://{}/sitemap.xml", config.domain),
    )
        .into_response()
}

#[must_use]
pub fn sitemap_body(config: &DomainConfig) -> String {
    let mut body = String::from(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    for slug in &config.slugs {
        body.push_str("<url><loc>https://");
        body.push_str(&config.domain);
        body.push('/');
        body.push_str(&escape_xml(slug));
        body.push_str("</loc></url>");
    }
    body.push_str("</urlset>");
    body
}

#[must_use]
pub fn sitemap_xml(config: &DomainConfig) -> Response {
    (
        [(header::CONTENT_TYPE, "application/xml")],
        sitemap_body(config),
    )
        .into_response()
}

/// Answer an `OPTIONS` request. A full CORS preflight gets the CORS
/// headers; anything else gets a plain `Allow`.
#[must_use]
pub fn options(request_headers: &HeaderMap) -> Response {
    if is_cors_preflight(request_headers) {
        (
            [
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS),
                (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            ],
            Body::empty(),
        )
            .into_response()
    } else {
        ([(header::ALLOW, ALLOWED_METHODS)], Body::empty()).into_response()
    }
}

/// `301` to `location`. Axum's `Redirect::permanent` is a 308.
#[must_use]
pub fn moved_permanently(location: &str) -> Response {
    match header::HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::error!(location = %location, error = %e, "invalid redirect location");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[must_use]
pub fn slug_redirect(config: &DomainConfig, page: &str) -> Response {
    moved_permanently(&format!("https://{}/{page}", config.domain))
}

#[must_use]
pub fn root_redirect(config: &DomainConfig) -> Response {
    moved_permanently(&format!("https://{}", config.domain))
}

/// Map a request failure to the response the caller sees.
#[must_use]
pub fn error_response(err: &GatewayError) -> Response {
    match err {
        GatewayError::ConfigNotFound { .. } => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain;charset=UTF-8")],
            NOT_FOUND_BODY,
        )
            .into_response(),
        GatewayError::UpstreamFetch { .. } => StatusCode::BAD_GATEWAY.into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
