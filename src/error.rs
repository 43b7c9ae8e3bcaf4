//! Unified error types for pagefront.
//!
//! Defines [`GatewayError`] (the main crate error enum) and
//! [`ValidationError`] for store file validation failures. Both use
//! `thiserror` for `Display` and `Error` derives. The first five
//! variants form the per-request taxonomy; the rest serve the CLI.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub tenant: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {} - {}", self.tenant, self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("Domain not found in configuration: {hostname}")]
    ConfigNotFound { hostname: String },

    #[error("Malformed configuration for {hostname}: {source}")]
    MalformedConfig {
        hostname: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config store error ({backend}): {source}")]
    Store {
        backend: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Upstream fetch failed: {source}")]
    UpstreamFetch {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTML rewriting failed: {source}")]
    Rewrite {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("No config source found.\n\n  {hint}")]
    NoConfigSource { hint: String },

    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}

impl GatewayError {
    pub fn malformed(
        hostname: &str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::MalformedConfig {
            hostname: hostname.to_string(),
            source: source.into(),
        }
    }

    pub fn upstream(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::UpstreamFetch {
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display_includes_suggestion() {
        let err = ValidationError {
            tenant: "example.com".into(),
            field: "slugToPage./about".into(),
            message: "slug must not start with '/'".into(),
            suggestion: Some("did you mean 'about'?".into()),
        };
        assert_eq!(
            err.to_string(),
            "  example.com: slugToPage./about - slug must not start with '/' (did you mean 'about'?)"
        );
    }

    #[test]
    fn config_validation_lists_every_error() {
        let errors = vec![
            ValidationError {
                tenant: "a.com".into(),
                field: "slugToPage".into(),
                message: "first".into(),
                suggestion: None,
            },
            ValidationError {
                tenant: "b.com".into(),
                field: "slugToPage".into(),
                message: "second".into(),
                suggestion: None,
            },
        ];
        let rendered = GatewayError::ConfigValidation { errors }.to_string();
        assert!(rendered.contains("a.com: slugToPage - first"));
        assert!(rendered.contains("b.com: slugToPage - second"));
    }
}
