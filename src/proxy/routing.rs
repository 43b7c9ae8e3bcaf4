//! Path classification for incoming requests.
//!
//! [`classify`] maps a request method and path to a [`RouteDecision`].
//! Rules are checked in a fixed order and the first match wins:
//! well-known files are never shadowed by tenant slugs, and configured
//! slugs are checked before the page-id heuristic so a mapped page is
//! never treated as a stale identifier.

use std::sync::LazyLock;

use axum::http::Method;
use regex::Regex;

use crate::config::model::DomainConfig;

static PAGE_ID_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[0-9a-f]{32}").expect("page id pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Preflight,
    RobotsText,
    Sitemap,
    AssetJs,
    ApiCall,
    SlugRedirect(String),
    AmbiguousIdRedirect,
    Passthrough,
}

impl RouteDecision {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Preflight => "preflight",
            Self::RobotsText => "robots",
            Self::Sitemap => "sitemap",
            Self::AssetJs => "asset_js",
            Self::ApiCall => "api",
            Self::SlugRedirect(_) => "slug_redirect",
            Self::AmbiguousIdRedirect => "ambiguous_id_redirect",
            Self::Passthrough => "passthrough",
        }
    }
}

#[must_use]
pub fn classify(method: &Method, path: &str, config: &DomainConfig) -> RouteDecision {
    if method == Method::OPTIONS {
        return RouteDecision::Preflight;
    }
    if path == "/robots.txt" {
        return RouteDecision::RobotsText;
    }
    if path == "/sitemap.xml" {
        return RouteDecision::Sitemap;
    }
    if path.starts_with("/app") && path.ends_with("js") {
        return RouteDecision::AssetJs;
    }
    if path.starts_with("/api") {
        return RouteDecision::ApiCall;
    }

    let slug = path.strip_prefix('/').unwrap_or(path);

    if let Some(page) = config.page_for_slug(slug) {
        return RouteDecision::SlugRedirect(page.to_string());
    }

    // Unanchored on purpose: any 32-hex run anywhere in the path counts.
    if !config.is_known_page(slug) && PAGE_ID_RUN.is_match(slug) {
        return RouteDecision::AmbiguousIdRedirect;
    }

    RouteDecision::Passthrough
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::TenantDocument;

    const HOME: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1";
    const ABOUT: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2";
    const STRAY: &str = "ccccccccccccccccccccccccccccccc3";

    fn config(extra: &[(&str, &str)]) -> DomainConfig {
        let mut doc = TenantDocument::default();
        doc.slug_to_page.insert(String::new(), HOME.into());
        doc.slug_to_page.insert("about".into(), ABOUT.into());
        for (slug, page) in extra {
            doc.slug_to_page.insert((*slug).into(), (*page).into());
        }
        DomainConfig::from_document("example.com", doc, "acme.notion.site")
    }

    #[test]
    fn options_is_preflight_for_any_path() {
        let c = config(&[]);
        assert_eq!(classify(&Method::OPTIONS, "/about", &c), RouteDecision::Preflight);
        assert_eq!(classify(&Method::OPTIONS, "/api/v3/x", &c), RouteDecision::Preflight);
    }

    #[test]
    fn well_known_files_beat_slugs() {
        let c = config(&[("robots.txt", STRAY), ("sitemap.xml", STRAY)]);
        assert_eq!(classify(&Method::GET, "/robots.txt", &c), RouteDecision::RobotsText);
        assert_eq!(classify(&Method::GET, "/sitemap.xml", &c), RouteDecision::Sitemap);
    }

    #[test]
    fn asset_and_api_prefixes() {
        let c = config(&[]);
        assert_eq!(
            classify(&Method::GET, "/app-3f2a9c.js", &c),
            RouteDecision::AssetJs
        );
        assert_eq!(
            classify(&Method::GET, "/app/vendors.js", &c),
            RouteDecision::AssetJs
        );
        assert_eq!(
            classify(&Method::GET, "/app.css", &c),
            RouteDecision::Passthrough
        );
        assert_eq!(
            classify(&Method::POST, "/api/v3/loadPageChunk", &c),
            RouteDecision::ApiCall
        );
        assert_eq!(classify(&Method::GET, "/apixyz", &c), RouteDecision::ApiCall);
    }

    #[test]
    fn configured_slug_redirects_to_page() {
        let c = config(&[]);
        assert_eq!(
            classify(&Method::GET, "/about", &c),
            RouteDecision::SlugRedirect(ABOUT.into())
        );
        assert_eq!(
            classify(&Method::GET, "/", &c),
            RouteDecision::SlugRedirect(HOME.into())
        );
    }

    #[test]
    fn slug_shaped_like_page_id_still_redirects() {
        let c = config(&[(STRAY, ABOUT)]);
        assert_eq!(
            classify(&Method::GET, &format!("/{STRAY}"), &c),
            RouteDecision::SlugRedirect(ABOUT.into())
        );
    }

    #[test]
    fn unmapped_page_id_is_ambiguous() {
        let c = config(&[]);
        assert_eq!(
            classify(&Method::GET, &format!("/{STRAY}"), &c),
            RouteDecision::AmbiguousIdRedirect
        );
        assert_eq!(
            classify(&Method::GET, &format!("/Some-Title-{STRAY}"), &c),
            RouteDecision::AmbiguousIdRedirect
        );
    }

    #[test]
    fn mapped_page_id_passes_through() {
        let c = config(&[]);
        assert_eq!(
            classify(&Method::GET, &format!("/{ABOUT}"), &c),
            RouteDecision::Passthrough
        );
    }

    #[test]
    fn titled_mapped_page_is_still_ambiguous() {
        // Membership is checked against the whole path, not the trailing id.
        let c = config(&[]);
        assert_eq!(
            classify(&Method::GET, &format!("/About-{ABOUT}"), &c),
            RouteDecision::AmbiguousIdRedirect
        );
    }

    #[test]
    fn uppercase_hex_is_not_a_page_id() {
        let c = config(&[]);
        assert_eq!(
            classify(&Method::GET, "/CCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC3", &c),
            RouteDecision::Passthrough
        );
    }

    #[test]
    fn everything_else_passes_through() {
        let c = config(&[]);
        assert_eq!(
            classify(&Method::GET, "/images/logo.png", &c),
            RouteDecision::Passthrough
        );
        assert_eq!(
            classify(&Method::GET, "/about/", &c),
            RouteDecision::Passthrough
        );
    }
}
