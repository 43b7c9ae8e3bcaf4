//! `pagefront run`: start the gateway.
//!
//! Picks the tenant store (Redis, then `SQLite`, then a store file or a
//! single-tenant document), builds the shared state and serves until
//! SIGTERM or Ctrl+C.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config::sources;
use crate::config::{ConfigResolver, ConfigStore};
use crate::error::GatewayError;
use crate::logging;
use crate::proxy::upstream::{Upstream, UpstreamSettings};
use crate::server::{self, AppState};

const STORE_FILE_CANDIDATES: [&str; 4] = [
    "pagefront.yaml",
    "pagefront.yml",
    "pagefront.json",
    "pagefront.toml",
];

pub async fn execute(args: RunArgs) -> Result<(), GatewayError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let store = resolve_store(&args).await?;
    let store_name = store.name();
    let resolver = ConfigResolver::new(store, args.upstream_site.clone());

    let settings = UpstreamSettings {
        origin: args.upstream_origin.clone(),
        marketing_domain: args.marketing_domain.clone(),
        service_domain: args.service_domain.clone(),
    };
    let upstream = Upstream::new(server::build_http_client(), settings);

    let state = Arc::new(AppState::new(resolver, upstream));
    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        store = store_name,
        upstream_site = %args.upstream_site,
        upstream_origin = args.upstream_origin.as_ref().map(url::Url::as_str),
        "pagefront started"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("pagefront stopped");
    Ok(())
}

async fn resolve_store(args: &RunArgs) -> Result<Box<dyn ConfigStore>, GatewayError> {
    #[cfg(feature = "redis")]
    if let Some(ref url) = args.redis_url {
        let store = sources::redis_source::RedisStore::new(url, &args.redis_prefix).await?;
        return Ok(Box::new(store));
    }

    #[cfg(feature = "sqlite")]
    if let Some(ref path) = args.sqlite_path {
        let store = sources::sqlite::SqliteStore::new(path).await?;
        return Ok(Box::new(store));
    }

    if let Some(ref path) = args.site {
        tracing::info!(path = %path.display(), "serving a single tenant for every hostname");
        let store = sources::static_source::StaticStore::from_file(path).await?;
        return Ok(Box::new(store));
    }

    if let Some(store) = resolve_file_store(args.config.as_deref()).await? {
        return Ok(store);
    }

    Err(GatewayError::NoConfigSource {
        hint: "Provide --config <file>, --site <file> or a database backend flag.\n  \
               Run 'pagefront init' to create a store file."
            .into(),
    })
}

async fn resolve_file_store(
    explicit: Option<&Path>,
) -> Result<Option<Box<dyn ConfigStore>>, GatewayError> {
    if let Some(path) = explicit {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(GatewayError::ConfigFileNotFound {
                path: path.to_path_buf(),
            });
        }
        return create_file_store(path).map(Some);
    }

    for name in &STORE_FILE_CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected store file");
            return create_file_store(&path).map(Some);
        }
    }

    Ok(None)
}

fn create_file_store(path: &Path) -> Result<Box<dyn ConfigStore>, GatewayError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(Box::new(sources::yaml::new(path.to_path_buf()))),

        #[cfg(feature = "json")]
        "json" => Ok(Box::new(sources::json::new(path.to_path_buf()))),

        #[cfg(feature = "toml")]
        "toml" => Ok(Box::new(sources::toml_source::new(path.to_path_buf()))),

        other => Err(GatewayError::UnsupportedFormat(other.to_string())),
    }
}
