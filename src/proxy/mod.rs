//! The gateway request handler.
//!
//! [`gateway_handler`] is the Axum fallback that receives every request
//! outside the gateway's own health route. It resolves the tenant from
//! the request hostname, classifies the path ([`routing`]), and either
//! answers directly ([`responses`]) or goes to the origin through the
//! script rewriter ([`assets`]), the API forwarder ([`api`]) or the
//! document passthrough ([`passthrough`]).

pub mod api;
pub mod assets;
pub mod headers;
pub mod passthrough;
pub mod responses;
pub mod routing;
pub mod upstream;

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, Uri};
use axum::response::Response;

use crate::config::model::normalize_hostname;
use crate::error::GatewayError;
use crate::server::AppState;
use routing::RouteDecision;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Hostname the request was addressed to: the `Host` header, else the
/// authority of an absolute-form request target.
#[must_use]
pub fn request_host<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> Option<&'a str> {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .or_else(|| uri.host())
}

pub async fn gateway_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let correlation_id = req_headers
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    let path = uri.path();
    let path_and_query = uri.path_and_query().map_or(path, |pq| pq.as_str());

    let Some(host) = request_host(&req_headers, &uri) else {
        tracing::warn!(
            correlation_id = %correlation_id,
            method = %method,
            path = %path,
            "request without a hostname"
        );
        state.stats.not_found.fetch_add(1, Ordering::Relaxed);
        let err = GatewayError::ConfigNotFound {
            hostname: String::new(),
        };
        return with_correlation(responses::error_response(&err), &correlation_id);
    };
    let hostname = normalize_hostname(host);

    let config = match state.resolver.resolve(&hostname).await {
        Ok(config) => config,
        Err(e) => {
            if matches!(e, GatewayError::ConfigNotFound { .. }) {
                tracing::info!(
                    correlation_id = %correlation_id,
                    host = %hostname,
                    path = %path,
                    "hostname not configured"
                );
                state.stats.not_found.fetch_add(1, Ordering::Relaxed);
            } else {
                tracing::error!(
                    correlation_id = %correlation_id,
                    host = %hostname,
                    error = %e,
                    "tenant configuration could not be resolved"
                );
                state.stats.failed.fetch_add(1, Ordering::Relaxed);
            }
            return with_correlation(responses::error_response(&e), &correlation_id);
        }
    };

    let decision = routing::classify(&method, path, &config);

    tracing::info!(
        correlation_id = %correlation_id,
        client = %addr.ip(),
        host = %hostname,
        method = %method,
        path = %path,
        decision = decision.label(),
        "request received"
    );

    let upstream = &state.upstream;
    let result = match decision {
        RouteDecision::Preflight => Ok(responses::options(&req_headers)),
        RouteDecision::RobotsText => Ok(responses::robots_txt(&config)),
        RouteDecision::Sitemap => Ok(responses::sitemap_xml(&config)),
        RouteDecision::SlugRedirect(ref page) => {
            state.stats.redirected.fetch_add(1, Ordering::Relaxed);
            Ok(responses::slug_redirect(&config, page))
        }
        RouteDecision::AmbiguousIdRedirect => {
            state.stats.redirected.fetch_add(1, Ordering::Relaxed);
            Ok(responses::root_redirect(&config))
        }
        RouteDecision::AssetJs => {
            assets::fetch_and_rewrite(upstream, &config, path_and_query).await
        }
        RouteDecision::ApiCall => {
            api::forward(upstream, &config, path, path_and_query, body).await
        }
        RouteDecision::Passthrough => {
            passthrough::forward(
                upstream,
                Arc::clone(&config),
                method.clone(),
                path_and_query,
                &req_headers,
                body,
            )
            .await
        }
    };

    match result {
        Ok(response) => {
            if matches!(
                decision,
                RouteDecision::AssetJs | RouteDecision::ApiCall | RouteDecision::Passthrough
            ) {
                state.stats.proxied.fetch_add(1, Ordering::Relaxed);
            }
            tracing::debug!(
                correlation_id = %correlation_id,
                status = response.status().as_u16(),
                decision = decision.label(),
                "response ready"
            );
            with_correlation(response, &correlation_id)
        }
        Err(e) => {
            tracing::warn!(
                correlation_id = %correlation_id,
                host = %hostname,
                method = %method,
                path = %path,
                decision = decision.label(),
                error = %e,
                "upstream request failed"
            );
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            with_correlation(responses::error_response(&e), &correlation_id)
        }
    }
}

fn with_correlation(mut response: Response, correlation_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(correlation_id) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_header_wins_over_uri() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "www.example.com:8080".parse().unwrap());
        let uri: Uri = "http://other.org/about".parse().unwrap();
        assert_eq!(request_host(&headers, &uri), Some("www.example.com:8080"));
    }

    #[test]
    fn falls_back_to_uri_authority() {
        let uri: Uri = "http://example.com/about".parse().unwrap();
        assert_eq!(request_host(&HeaderMap::new(), &uri), Some("example.com"));

        let origin_form: Uri = "/about".parse().unwrap();
        assert_eq!(request_host(&HeaderMap::new(), &origin_form), None);
    }
}
