//! Axum server setup, shared application state, and graceful shutdown.
//!
//! [`AppState`] holds the tenant resolver, the upstream client and the
//! request counters. [`build_router`] mounts the health route and the
//! gateway fallback behind the tracing and body limit layers.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::get;
use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ConfigResolver;
use crate::health::health_handler;
use crate::proxy;
use crate::proxy::upstream::Upstream;

/// The gateway's own health route. Namespaced so it never shadows a
/// tenant path.
pub const HEALTH_PATH: &str = "/_pagefront/health";

#[derive(Debug, Default)]
pub struct Stats {
    pub proxied: AtomicU64,
    pub redirected: AtomicU64,
    pub not_found: AtomicU64,
    pub failed: AtomicU64,
}

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, http_body_util::Full<bytes::Bytes>>;

pub struct AppState {
    pub resolver: ConfigResolver,
    pub upstream: Upstream,
    pub start_time: Instant,
    pub stats: Stats,
}

impl AppState {
    #[must_use]
    pub fn new(resolver: ConfigResolver, upstream: Upstream) -> Self {
        Self {
            resolver,
            upstream,
            start_time: Instant::now(),
            stats: Stats::default(),
        }
    }
}

#[must_use]
pub fn build_http_client() -> HttpClient {
    // With both `ring` and `aws-lc-rs` compiled in, rustls cannot pick a
    // provider on its own.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

pub fn build_router(state: Arc<AppState>, max_body: usize) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health_handler))
        .fallback(proxy::gateway_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
