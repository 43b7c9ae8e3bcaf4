//! Forwarding of every request no other rule claims.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method};
use axum::response::Response;
use bytes::Bytes;

use super::headers::{
    is_html, is_identity_encoded, passthrough_request_headers, strip_content_security_policy,
    strip_hop_by_hop,
};
use super::upstream::Upstream;
use crate::config::model::DomainConfig;
use crate::error::GatewayError;
use crate::rewrite::transform_body;

/// Forward the request as-is and stream the response back. Identity
/// encoded HTML is rewritten on the way through; anything else is
/// untouched apart from its headers.
pub async fn forward(
    upstream: &Upstream,
    config: Arc<DomainConfig>,
    method: Method,
    path_and_query: &str,
    request_headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let uri = upstream.uri_for(&config.upstream_site, path_and_query)?;
    let response = upstream
        .send(method, uri, passthrough_request_headers(request_headers), body)
        .await?;

    let (mut parts, incoming) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    strip_content_security_policy(&mut parts.headers);

    if is_html(&parts.headers) && is_identity_encoded(&parts.headers) {
        parts.headers.remove(header::CONTENT_LENGTH);
        return Ok(Response::from_parts(parts, transform_body(incoming, config)));
    }

    Ok(Response::from_parts(parts, Body::new(incoming)))
}
