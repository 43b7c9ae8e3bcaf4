//! `GET /_pagefront/health` endpoint handler.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub build: BuildInfo,
    pub uptime_seconds: u64,
    pub store: String,
    pub tenants_cached: usize,
    pub stats: StatsResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub git: String,
    pub profile: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub proxied: u64,
    pub redirected: u64,
    pub not_found: u64,
    pub failed: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let stats = &state.stats;
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: BuildInfo {
            git: env!("PAGEFRONT_GIT_SHORT").to_string(),
            profile: env!("PAGEFRONT_BUILD_PROFILE").to_string(),
        },
        uptime_seconds: state.start_time.elapsed().as_secs(),
        store: state.resolver.store_name().to_string(),
        tenants_cached: state.resolver.cached_tenants(),
        stats: StatsResponse {
            proxied: stats.proxied.load(Ordering::Relaxed),
            redirected: stats.redirected.load(Ordering::Relaxed),
            not_found: stats.not_found.load(Ordering::Relaxed),
            failed: stats.failed.load(Ordering::Relaxed),
        },
    })
}
