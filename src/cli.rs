//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, init, validate, health), and their associated
//! argument structs. Every `run` flag has an environment variable
//! equivalent for container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;

use crate::proxy::upstream::{DEFAULT_MARKETING_DOMAIN, DEFAULT_SERVICE_DOMAIN};

#[derive(Parser)]
#[command(
    name = "pagefront",
    version,
    about = "Custom-domain gateway for hosted page sites",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        pagefront init                                   Create a starter store file\n  \
        pagefront run --upstream-site acme.notion.site   Start with ./pagefront.yaml\n  \
        pagefront validate pagefront.yaml                Check a store file"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the gateway
    Run(Box<RunArgs>),

    /// Generate a starter store file
    Init(InitArgs),

    /// Validate a store file without starting
    Validate(ValidateArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        pagefront run --upstream-site acme.notion.site                  Auto-detect store file\n  \
        pagefront run -c tenants.json --upstream-site acme.notion.site  Specific store file\n  \
        pagefront run --site site.json --upstream-site acme.notion.site Single tenant")]
pub struct RunArgs {
    /// Store file path (.yaml, .yml, .json, .toml) mapping hostnames to tenant documents
    #[arg(short, long, env = "CONFIG_FILE", conflicts_with = "site")]
    pub config: Option<PathBuf>,

    /// Single tenant document served for every hostname
    #[arg(long, env = "SITE_FILE")]
    pub site: Option<PathBuf>,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // -- Upstream --
    /// Upstream site host used when a tenant does not set its own, e.g. `acme.notion.site`
    #[arg(long, env = "UPSTREAM_SITE", help_heading = "Upstream")]
    pub upstream_site: String,

    /// Send every upstream request to this origin instead of `https://<site>`
    #[arg(long, env = "UPSTREAM_ORIGIN", help_heading = "Upstream")]
    pub upstream_origin: Option<Url>,

    /// Upstream marketing domain rewritten in script assets
    #[arg(
        long,
        env = "MARKETING_DOMAIN",
        default_value = DEFAULT_MARKETING_DOMAIN,
        help_heading = "Upstream"
    )]
    pub marketing_domain: String,

    /// Upstream service domain rewritten in script assets
    #[arg(
        long,
        env = "SERVICE_DOMAIN",
        default_value = DEFAULT_SERVICE_DOMAIN,
        help_heading = "Upstream"
    )]
    pub service_domain: String,

    // -- Database Backends --
    /// Redis connection URL
    #[cfg(feature = "redis")]
    #[arg(long, env = "REDIS_URL", help_heading = "Database Backends")]
    pub redis_url: Option<String>,

    /// Key prefix for tenant documents in Redis
    #[cfg(feature = "redis")]
    #[arg(
        long,
        env = "REDIS_PREFIX",
        default_value = crate::config::sources::redis_source::DEFAULT_PREFIX,
        help_heading = "Database Backends"
    )]
    pub redis_prefix: String,

    /// `SQLite` database path
    #[cfg(feature = "sqlite")]
    #[arg(long, env = "SQLITE_PATH", help_heading = "Database Backends")]
    pub sqlite_path: Option<PathBuf>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        pagefront init                            Starter store file (yaml)\n  \
        pagefront init --full                     With every tenant field\n  \
        pagefront init -f json -o tenants.json    JSON format")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include every optional tenant field
    #[arg(long)]
    pub full: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Store file to validate
    #[arg(default_value = "pagefront.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:3000")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
