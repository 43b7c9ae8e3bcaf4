//! The upstream page origin.
//!
//! [`Upstream`] pairs the pooled HTTP client with the settings that
//! describe the origin: where requests are sent and which domain
//! literals appear in its assets. Requests for a tenant go to
//! `https://<tenant upstream site>` unless an explicit origin override
//! is configured.

use axum::http::{HeaderMap, Method, Uri};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use url::Url;

use crate::error::GatewayError;
use crate::server::HttpClient;

pub const DEFAULT_MARKETING_DOMAIN: &str = "www.notion.so";
pub const DEFAULT_SERVICE_DOMAIN: &str = "notion.so";

#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    /// Send every request here instead of `https://<site>`.
    pub origin: Option<Url>,
    pub marketing_domain: String,
    pub service_domain: String,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            origin: None,
            marketing_domain: DEFAULT_MARKETING_DOMAIN.to_string(),
            service_domain: DEFAULT_SERVICE_DOMAIN.to_string(),
        }
    }
}

pub struct Upstream {
    client: HttpClient,
    settings: UpstreamSettings,
}

impl Upstream {
    #[must_use]
    pub const fn new(client: HttpClient, settings: UpstreamSettings) -> Self {
        Self { client, settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &UpstreamSettings {
        &self.settings
    }

    /// Absolute URI of `path_and_query` on the tenant's upstream site.
    pub fn uri_for(&self, site: &str, path_and_query: &str) -> Result<Uri, GatewayError> {
        let base = self.settings.origin.as_ref().map_or_else(
            || format!("https://{site}"),
            |origin| origin.as_str().trim_end_matches('/').to_string(),
        );

        format!("{base}{path_and_query}")
            .parse::<Uri>()
            .map_err(|e| GatewayError::UriParse {
                source: Box::new(e),
            })
    }

    /// Send one request. Network failures become
    /// [`GatewayError::UpstreamFetch`]; error statuses are returned as
    /// ordinary responses.
    pub async fn send(
        &self,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<hyper::Response<Incoming>, GatewayError> {
        let mut req_builder = hyper::Request::builder().method(method).uri(uri);

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        let req = req_builder
            .body(Full::new(body))
            .map_err(|e| GatewayError::HttpRequest {
                source: Box::new(e),
            })?;

        self.client.request(req).await.map_err(GatewayError::upstream)
    }
}
