//! Serde data structures for tenant documents and the resolved
//! [`DomainConfig`].
//!
//! A [`TenantDocument`] is what a store returns for one hostname. It
//! accepts both the camelCase field names and the upper-case names used
//! by older worker deployments. [`DomainConfig::from_document`] is the
//! single place where the reverse mapping and the ordered slug/page
//! lists are derived.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Page identifiers are 32 lowercase hex characters.
pub const PAGE_ID_LEN: usize = 32;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantDocument {
    #[serde(alias = "SLUG_TO_PAGE")]
    pub slug_to_page: IndexMap<String, String>,

    #[serde(default, alias = "PAGE_TITLE", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(
        default,
        alias = "PAGE_DESCRIPTION",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(default, alias = "GOOGLE_FONT", skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,

    #[serde(
        default,
        alias = "CUSTOM_SCRIPT",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_script: Option<String>,

    /// Upstream site host for this tenant, e.g. `acme.notion.site`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,

    /// Ignored: the public domain always comes from the request hostname.
    #[serde(default, alias = "MY_DOMAIN", skip_serializing)]
    pub domain: Option<String>,
}

impl TenantDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Resolved configuration for one public hostname. Never mutated after
/// construction; shared as `Arc<DomainConfig>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainConfig {
    pub domain: String,
    pub slug_to_page: IndexMap<String, String>,
    pub page_to_slug: HashMap<String, String>,
    pub slugs: Vec<String>,
    pub pages: Vec<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub font: Option<String>,
    pub custom_script: Option<String>,
    pub upstream_site: String,
}

impl DomainConfig {
    /// Build the resolved config from a parsed document.
    ///
    /// `domain` must already be normalized (see [`normalize_hostname`]).
    /// When two slugs share a page id the later slug wins in
    /// `page_to_slug`.
    #[must_use]
    pub fn from_document(domain: &str, doc: TenantDocument, default_site: &str) -> Self {
        let mut page_to_slug = HashMap::with_capacity(doc.slug_to_page.len());
        let mut slugs = Vec::with_capacity(doc.slug_to_page.len());
        let mut pages = Vec::with_capacity(doc.slug_to_page.len());

        for (slug, page) in &doc.slug_to_page {
            slugs.push(slug.clone());
            pages.push(page.clone());
            if let Some(previous) = page_to_slug.insert(page.clone(), slug.clone()) {
                tracing::warn!(
                    domain = %domain,
                    page = %page,
                    previous_slug = %previous,
                    slug = %slug,
                    "page mapped by more than one slug, later slug wins"
                );
            }
        }

        Self {
            domain: domain.to_string(),
            slug_to_page: doc.slug_to_page,
            page_to_slug,
            slugs,
            pages,
            title: non_empty(doc.title),
            description: non_empty(doc.description),
            font: non_empty(doc.font),
            custom_script: non_empty(doc.custom_script),
            upstream_site: non_empty(doc.site).unwrap_or_else(|| default_site.to_string()),
        }
    }

    #[must_use]
    pub fn page_for_slug(&self, slug: &str) -> Option<&str> {
        self.slug_to_page.get(slug).map(String::as_str)
    }

    #[must_use]
    pub fn is_known_page(&self, page: &str) -> bool {
        self.pages.iter().any(|p| p == page)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Lowercase, drop any `:port`, and strip one leading `www.`.
#[must_use]
pub fn normalize_hostname(host: &str) -> String {
    let host = host.trim().to_ascii_lowercase();
    let without_port = match host.rsplit_once(':') {
        Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name.to_string(),
        _ => host,
    };
    if let Some(rest) = without_port.strip_prefix("www.") {
        return rest.to_string();
    }
    without_port
}

#[must_use]
pub fn is_page_id(value: &str) -> bool {
    value.len() == PAGE_ID_LEN && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1";
    const ABOUT: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2";
    const BLOG: &str = "ccccccccccccccccccccccccccccccc3";

    fn doc(json: &str) -> TenantDocument {
        TenantDocument::from_json(json).unwrap()
    }

    #[test]
    fn derives_parallel_lists_in_document_order() {
        let json = format!(
            r#"{{"slugToPage": {{"zeta": "{BLOG}", "": "{HOME}", "about": "{ABOUT}"}}}}"#
        );
        let config = DomainConfig::from_document("example.com", doc(&json), "acme.notion.site");

        assert_eq!(config.slugs, vec!["zeta", "", "about"]);
        assert_eq!(config.pages, vec![BLOG, HOME, ABOUT]);
        assert_eq!(config.slugs.len(), config.pages.len());
        for slug in &config.slugs {
            let page = &config.slug_to_page[slug];
            assert_eq!(&config.page_to_slug[page], slug);
        }
    }

    #[test]
    fn duplicate_page_keeps_last_slug() {
        let json = format!(r#"{{"slugToPage": {{"old": "{ABOUT}", "about": "{ABOUT}"}}}}"#);
        let config = DomainConfig::from_document("example.com", doc(&json), "acme.notion.site");

        assert_eq!(config.page_to_slug.len(), 1);
        assert_eq!(config.page_to_slug[ABOUT], "about");
        assert_eq!(config.slugs, vec!["old", "about"]);
        assert_eq!(config.pages, vec![ABOUT, ABOUT]);
    }

    #[test]
    fn embedded_domain_is_ignored() {
        let json = format!(r#"{{"MY_DOMAIN": "other.org", "SLUG_TO_PAGE": {{"": "{HOME}"}}}}"#);
        let config = DomainConfig::from_document("example.com", doc(&json), "acme.notion.site");
        assert_eq!(config.domain, "example.com");
    }

    #[test]
    fn legacy_field_names_are_accepted() {
        let json = format!(
            r#"{{
                "SLUG_TO_PAGE": {{"": "{HOME}"}},
                "PAGE_TITLE": "Acme",
                "PAGE_DESCRIPTION": "Things",
                "GOOGLE_FONT": "Open Sans",
                "CUSTOM_SCRIPT": "<script>1</script>"
            }}"#
        );
        let config = DomainConfig::from_document("example.com", doc(&json), "acme.notion.site");
        assert_eq!(config.title.as_deref(), Some("Acme"));
        assert_eq!(config.description.as_deref(), Some("Things"));
        assert_eq!(config.font.as_deref(), Some("Open Sans"));
        assert_eq!(config.custom_script.as_deref(), Some("<script>1</script>"));
    }

    #[test]
    fn empty_strings_mean_no_override() {
        let json = format!(
            r#"{{"slugToPage": {{"": "{HOME}"}}, "title": "", "font": "", "site": ""}}"#
        );
        let config = DomainConfig::from_document("example.com", doc(&json), "acme.notion.site");
        assert!(config.title.is_none());
        assert!(config.font.is_none());
        assert_eq!(config.upstream_site, "acme.notion.site");
    }

    #[test]
    fn tenant_site_overrides_default() {
        let json = format!(r#"{{"slugToPage": {{"": "{HOME}"}}, "site": "other.notion.site"}}"#);
        let config = DomainConfig::from_document("example.com", doc(&json), "acme.notion.site");
        assert_eq!(config.upstream_site, "other.notion.site");
    }

    #[test]
    fn missing_mapping_is_rejected() {
        assert!(TenantDocument::from_json(r#"{"title": "x"}"#).is_err());
        assert!(TenantDocument::from_json(r#"{"slugToPage": ["a", "b"]}"#).is_err());
        assert!(TenantDocument::from_json("not json").is_err());
    }

    #[test]
    fn normalizes_hostnames() {
        assert_eq!(normalize_hostname("www.example.com"), "example.com");
        assert_eq!(normalize_hostname("WWW.Example.COM:8080"), "example.com");
        assert_eq!(normalize_hostname("example.com"), "example.com");
        assert_eq!(normalize_hostname("www.www.example.com"), "www.example.com");
    }

    #[test]
    fn page_id_shape() {
        assert!(is_page_id(HOME));
        assert!(!is_page_id("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA1"));
        assert!(!is_page_id("about"));
    }
}
