//! `pagefront health`: check the health of a running instance.
//!
//! Sends a `GET /_pagefront/health` request to the specified URL and
//! displays the response as formatted text or raw JSON.

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::HealthArgs;
use crate::error::GatewayError;
use crate::health::HealthResponse;
use crate::server::HEALTH_PATH;

pub async fn execute(args: HealthArgs) -> Result<(), GatewayError> {
    let url = format!("{}{HEALTH_PATH}", args.url.trim_end_matches('/'));
    let uri: hyper::Uri = url
        .parse()
        .map_err(|e: hyper::http::uri::InvalidUri| GatewayError::UriParse {
            source: Box::new(e),
        })?;

    let connector = hyper_util::client::legacy::connect::HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    let req = hyper::Request::builder()
        .uri(uri)
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| GatewayError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(std::time::Duration::from_secs(10), client.request(req))
        .await
        .map_err(|_| GatewayError::HttpRequest {
            source: "health check timed out after 10s".into(),
        })?
        .map_err(|e| GatewayError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| GatewayError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    if !status.is_success() {
        return Err(GatewayError::HealthCheckFailed(status));
    }

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<HealthResponse>(&body) {
        Ok(health) => print!("{}", render(&health, &args.url)),
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }

    Ok(())
}

fn render(health: &HealthResponse, url: &str) -> String {
    let stats = &health.stats;
    let mut out = format!("\u{2713} pagefront is {} ({url})\n", health.status);
    out.push_str(&format!(
        "  version:        {} ({}, {})\n",
        health.version, health.build.git, health.build.profile
    ));
    out.push_str(&format!("  uptime:         {}\n", format_uptime(health.uptime_seconds)));
    out.push_str(&format!(
        "  store:          {} ({} tenants cached)\n",
        health.store, health.tenants_cached
    ));
    out.push_str(&format!(
        "  requests:       {} proxied, {} redirected, {} not found, {} failed\n",
        stats.proxied, stats.redirected, stats.not_found, stats.failed
    ));
    out
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{BuildInfo, StatsResponse};

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(42), "42s");
        assert_eq!(format_uptime(125), "2m 5s");
        assert_eq!(format_uptime(3_725), "1h 2m 5s");
    }

    #[test]
    fn renders_store_and_counters() {
        let health = HealthResponse {
            status: "healthy".into(),
            version: "0.1.0".into(),
            build: BuildInfo {
                git: "abc1234".into(),
                profile: "release".into(),
            },
            uptime_seconds: 61,
            store: "yaml".into(),
            tenants_cached: 2,
            stats: StatsResponse {
                proxied: 10,
                redirected: 3,
                not_found: 1,
                failed: 0,
            },
        };

        let text = render(&health, "http://127.0.0.1:8080");
        assert!(text.starts_with("\u{2713} pagefront is healthy (http://127.0.0.1:8080)\n"));
        assert!(text.contains("uptime:         1m 1s"));
        assert!(text.contains("store:          yaml (2 tenants cached)"));
        assert!(text.contains("10 proxied, 3 redirected, 1 not found, 0 failed"));
    }
}
