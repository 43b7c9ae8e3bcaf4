//! `pagefront validate`: check a store file for errors.
//!
//! Parses and validates every tenant in the store file, reporting
//! results in either human-readable text or machine-readable JSON.

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::model::{normalize_hostname, TenantDocument};
use crate::config::sources::{parse_store_str, StoreFile};
use crate::config::validation;
use crate::error::GatewayError;

pub fn execute(args: &ValidateArgs) -> Result<(), GatewayError> {
    let path = &args.config;

    if !path.exists() {
        return Err(GatewayError::ConfigFileNotFound { path: path.clone() });
    }

    let content = std::fs::read_to_string(path)?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let store = parse_store_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&store) {
        match args.format {
            ValidateFormat::Text => {
                eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
                for error in &errors {
                    eprintln!("{error}");
                }
            }
            ValidateFormat::Json => {
                let json_errors: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "tenant": e.tenant,
                            "field": e.field,
                            "message": e.message,
                            "suggestion": e.suggestion,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "errors": json_errors,
                    })
                );
            }
        }
        return Err(GatewayError::ConfigValidation { errors });
    }

    match args.format {
        ValidateFormat::Text => {
            println!(
                "\u{2713} {}",
                validation::format_validation_report(&path.display().to_string(), &store)
            );
        }
        ValidateFormat::Json => {
            let tenants = tenant_summaries(&store);
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "tenants": tenants,
                })
            );
        }
    }

    Ok(())
}

/// One entry per tenant: normalized hostname, slugs in sitemap order and
/// the upstream site override, if any.
fn tenant_summaries(store: &StoreFile) -> Vec<serde_json::Value> {
    store
        .iter()
        .filter_map(|(host, value)| {
            let doc = serde_json::from_value::<TenantDocument>(value.clone()).ok()?;
            Some(serde_json::json!({
                "hostname": normalize_hostname(host),
                "slugs": doc.slug_to_page.keys().collect::<Vec<_>>(),
                "site": doc.site,
            }))
        })
        .collect()
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;

    #[test]
    fn summaries_keep_slug_order() {
        let store = parse_store_str(
            "json",
            r#"{"www.Example.com": {
                "slugToPage": {"zeta": "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1", "": "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa2"},
                "site": "acme.notion.site"
            }}"#,
            "store.json",
        )
        .unwrap();

        let summaries = tenant_summaries(&store);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0]["hostname"], "example.com");
        assert_eq!(summaries[0]["slugs"], serde_json::json!(["zeta", ""]));
        assert_eq!(summaries[0]["site"], "acme.notion.site");
    }
}
