//! Forwarding of `/api*` calls.
//!
//! Calls are always sent as `POST` with a fixed header set. The response
//! body streams straight back to the caller.

use axum::body::Body;
use axum::http::{header, HeaderValue, Method};
use axum::response::Response;
use bytes::Bytes;

use super::headers::{api_request_headers, strip_hop_by_hop};
use super::upstream::Upstream;
use crate::config::model::DomainConfig;
use crate::error::GatewayError;

/// The page-data read rejects request bodies.
pub const BODYLESS_PREFIX: &str = "/api/v3/getPublicPageData";

#[must_use]
pub fn forwarded_body(path: &str, body: Bytes) -> Bytes {
    if path.starts_with(BODYLESS_PREFIX) {
        Bytes::new()
    } else {
        body
    }
}

pub async fn forward(
    upstream: &Upstream,
    config: &DomainConfig,
    path: &str,
    path_and_query: &str,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let uri = upstream.uri_for(&config.upstream_site, path_and_query)?;
    let response = upstream
        .send(
            Method::POST,
            uri,
            api_request_headers(),
            forwarded_body(path, body),
        )
        .await?;

    let (mut parts, incoming) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    parts.headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    Ok(Response::from_parts(parts, Body::new(incoming)))
}
