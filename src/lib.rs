//! pagefront is a custom-domain gateway for hosted page sites.
//!
//! It answers requests for a tenant's own domain, resolves the tenant's
//! slug-to-page mapping by hostname, and forwards to the upstream page
//! service. Slugs redirect to their pages, script assets and API calls
//! are rewritten to keep the browser on the tenant's domain, and HTML
//! documents are rewritten while they stream: metadata overrides, a web
//! font, and a navigation script that keeps slugs in the address bar.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate, health).
//! - [`config`] -- Tenant documents, the [`ConfigStore`](config::ConfigStore)
//!   trait with file and database stores, and the caching resolver.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- `GET /_pagefront/health` endpoint handler.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- The gateway handler: path classification, local responses,
//!   and the upstream forwarders.
//! - [`rewrite`] -- Streaming HTML transformation and the injected script.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML store file support _(enabled by default)_ |
//! | `json` | JSON store file support _(enabled by default)_ |
//! | `toml` | TOML store file support |
//! | `redis` | Redis tenant store |
//! | `sqlite` | SQLite tenant store |
//! | `file-backends` | All file format stores |
//! | `db-backends` | All database stores |
//! | `full` | All features |

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod rewrite;
pub mod server;
