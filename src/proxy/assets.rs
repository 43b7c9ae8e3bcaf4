//! Script asset rewriting.
//!
//! Upstream bundles hard-code the origin's own domains. [`rewrite_domains`]
//! replaces the three literal forms with the tenant's public domain so
//! the client keeps talking to the gateway. The whole asset is read
//! first: a literal may straddle any chunk boundary.

use axum::body::Body;
use axum::http::{header, HeaderValue, Method};
use axum::response::Response;
use bytes::Bytes;
use http_body_util::BodyExt;

use super::headers::{asset_request_headers, strip_hop_by_hop};
use super::upstream::{Upstream, UpstreamSettings};
use crate::config::model::DomainConfig;
use crate::error::GatewayError;

pub const SCRIPT_CONTENT_TYPE: &str = "application/x-javascript";

/// Replace the marketing domain, the service domain, and the tenant's
/// upstream site with the public domain, in that order.
#[must_use]
pub fn rewrite_domains(body: &str, config: &DomainConfig, settings: &UpstreamSettings) -> String {
    body.replace(&settings.marketing_domain, &config.domain)
        .replace(&settings.service_domain, &config.domain)
        .replace(&config.upstream_site, &config.domain)
}

pub async fn fetch_and_rewrite(
    upstream: &Upstream,
    config: &DomainConfig,
    path_and_query: &str,
) -> Result<Response, GatewayError> {
    let uri = upstream.uri_for(&config.upstream_site, path_and_query)?;
    let response = upstream
        .send(Method::GET, uri, asset_request_headers(), Bytes::new())
        .await?;

    let (mut parts, incoming) = response.into_parts();
    let collected = incoming
        .collect()
        .await
        .map_err(GatewayError::upstream)?
        .to_bytes();

    let body = match std::str::from_utf8(&collected) {
        Ok(text) => Bytes::from(rewrite_domains(text, config, upstream.settings())),
        Err(e) => {
            tracing::warn!(
                path = %path_and_query,
                error = %e,
                "script asset is not valid UTF-8, passing through unchanged"
            );
            collected
        }
    };

    strip_hop_by_hop(&mut parts.headers);
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(SCRIPT_CONTENT_TYPE),
    );

    Ok(Response::from_parts(parts, Body::from(body)))
}
