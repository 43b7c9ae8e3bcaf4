//! Store file validation with detailed error reporting.
//!
//! The [`validate`] function checks every tenant of a parsed
//! [`StoreFile`] for problems the gateway would otherwise only surface
//! at request time: documents that do not parse, malformed page ids,
//! slugs written with a leading slash, page ids mapped by more than one
//! slug (the reverse mapping keeps only the last), and slugs that can
//! never be reached because a built-in route matches first.

use std::collections::HashMap;

use super::model::{is_page_id, normalize_hostname, TenantDocument};
use super::sources::StoreFile;
use crate::error::ValidationError;

/// Explain why a slug can never be served, if a built-in route shadows it.
#[must_use]
pub fn shadowing_route(slug: &str) -> Option<&'static str> {
    let path = format!("/{slug}");
    if path == "/robots.txt" {
        Some("/robots.txt")
    } else if path == "/sitemap.xml" {
        Some("/sitemap.xml")
    } else if path.starts_with("/app") && path.ends_with("js") {
        Some("/app*js")
    } else if path.starts_with("/api") {
        Some("/api*")
    } else {
        None
    }
}

pub fn validate(store: &StoreFile) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if store.is_empty() {
        errors.push(ValidationError {
            tenant: "(root)".into(),
            field: "(root)".into(),
            message: "at least one tenant must be defined".into(),
            suggestion: None,
        });
        return Err(errors);
    }

    let mut seen_hosts = HashMap::new();

    for (host, value) in store {
        let tenant = host.clone();
        let normalized = normalize_hostname(host);

        if let Some(previous) = seen_hosts.insert(normalized.clone(), host.clone()) {
            errors.push(ValidationError {
                tenant: tenant.clone(),
                field: "(hostname)".into(),
                message: format!("resolves to the same domain as '{previous}'"),
                suggestion: None,
            });
        }

        let doc = match serde_json::from_value::<TenantDocument>(value.clone()) {
            Ok(doc) => doc,
            Err(e) => {
                errors.push(ValidationError {
                    tenant,
                    field: "(document)".into(),
                    message: e.to_string(),
                    suggestion: None,
                });
                continue;
            }
        };

        validate_tenant(&tenant, &doc, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_tenant(tenant: &str, doc: &TenantDocument, errors: &mut Vec<ValidationError>) {
    if doc.slug_to_page.is_empty() {
        errors.push(ValidationError {
            tenant: tenant.to_string(),
            field: "slugToPage".into(),
            message: "at least one slug must be defined".into(),
            suggestion: Some("map \"\" to the home page id".into()),
        });
        return;
    }

    let mut first_slug_for_page: HashMap<&str, &str> = HashMap::new();

    for (slug, page) in &doc.slug_to_page {
        let field = format!("slugToPage.{slug}");

        if !is_page_id(page) {
            let lowered = page.to_ascii_lowercase().replace('-', "");
            errors.push(ValidationError {
                tenant: tenant.to_string(),
                field: field.clone(),
                message: format!("'{page}' is not a 32-character lowercase hex page id"),
                suggestion: is_page_id(&lowered).then(|| format!("did you mean '{lowered}'?")),
            });
        }

        if let Some(stripped) = slug.strip_prefix('/') {
            errors.push(ValidationError {
                tenant: tenant.to_string(),
                field: field.clone(),
                message: "slug must not start with '/'".into(),
                suggestion: Some(format!("did you mean '{stripped}'?")),
            });
        }

        if let Some(route) = shadowing_route(slug) {
            errors.push(ValidationError {
                tenant: tenant.to_string(),
                field: field.clone(),
                message: format!("slug is unreachable, requests match the built-in {route} route"),
                suggestion: None,
            });
        }

        if let Some(first) = first_slug_for_page.insert(page.as_str(), slug.as_str()) {
            errors.push(ValidationError {
                tenant: tenant.to_string(),
                field,
                message: format!(
                    "page '{page}' is also mapped by slug '{first}'; only '{slug}' will be shown in the address bar"
                ),
                suggestion: None,
            });
        }
    }
}

#[must_use]
pub fn format_validation_report(path: &str, store: &StoreFile) -> String {
    let mut lines = vec![format!("  {} tenants\n", store.len())];

    for (host, value) in store {
        let Ok(doc) = serde_json::from_value::<TenantDocument>(value.clone()) else {
            continue;
        };
        lines.push(format!("  {host}  -> {} slugs", doc.slug_to_page.len()));
        if let Some(title) = doc.title.as_deref().filter(|t| !t.is_empty()) {
            lines.push(format!("    title: {title}"));
        }
        if let Some(site) = doc.site.as_deref().filter(|s| !s.is_empty()) {
            lines.push(format!("    site: {site}"));
        }
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1";
    const ABOUT: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2";

    fn store(json: &str) -> StoreFile {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn valid_store_passes() {
        let s = store(&format!(
            r#"{{"example.com": {{"slugToPage": {{"": "{HOME}", "about": "{ABOUT}"}}}}}}"#
        ));
        assert!(validate(&s).is_ok());
    }

    #[test]
    fn empty_store_fails() {
        let errors = validate(&StoreFile::new()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("at least one tenant"));
    }

    #[test]
    fn dashed_page_id_gets_suggestion() {
        let s = store(
            r#"{"example.com": {"slugToPage": {"": "AAAAAAAA-AAAA-AAAA-AAAA-AAAAAAAAAAA1"}}}"#,
        );
        let errors = validate(&s).unwrap_err();
        assert_eq!(
            errors[0].suggestion.as_deref(),
            Some("did you mean 'aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1'?")
        );
    }

    #[test]
    fn duplicate_page_is_reported() {
        let s = store(&format!(
            r#"{{"example.com": {{"slugToPage": {{"old": "{ABOUT}", "about": "{ABOUT}"}}}}}}"#
        ));
        let errors = validate(&s).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("also mapped by slug 'old'")));
    }

    #[test]
    fn leading_slash_slug_is_reported() {
        let s = store(&format!(
            r#"{{"example.com": {{"slugToPage": {{"/about": "{ABOUT}"}}}}}}"#
        ));
        let errors = validate(&s).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.suggestion.as_deref() == Some("did you mean 'about'?")));
    }

    #[test]
    fn shadowed_slugs_are_reported() {
        assert_eq!(shadowing_route("robots.txt"), Some("/robots.txt"));
        assert_eq!(shadowing_route("api-docs"), Some("/api*"));
        assert_eq!(shadowing_route("apps.js"), Some("/app*js"));
        assert_eq!(shadowing_route("about"), None);
    }

    #[test]
    fn www_and_bare_host_collide() {
        let s = store(&format!(
            r#"{{
                "example.com": {{"slugToPage": {{"": "{HOME}"}}}},
                "www.example.com": {{"slugToPage": {{"": "{HOME}"}}}}
            }}"#
        ));
        let errors = validate(&s).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.tenant == "www.example.com" && e.message.contains("same domain")));
    }

    #[test]
    fn unparseable_document_is_reported() {
        let s = store(r#"{"example.com": {"slugToPage": 1}}"#);
        let errors = validate(&s).unwrap_err();
        assert_eq!(errors[0].field, "(document)");
    }
}
