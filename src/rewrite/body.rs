//! The script appended to `body`.
//!
//! The navigation logic in `navigation.js` is static. Only the data block
//! in front of it is templated, as `window.__PAGEFRONT__`.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::model::DomainConfig;

const NAVIGATION_SCRIPT: &str = include_str!("navigation.js");

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageData<'a> {
    slug_to_page: &'a IndexMap<String, String>,
    page_to_slug: BTreeMap<&'a str, &'a str>,
    slugs: &'a [String],
    pages: &'a [String],
    domain: &'a str,
    upstream_site: &'a str,
}

/// JSON for the data block. `</` is escaped so no value can close the
/// surrounding script element.
pub fn page_data_json(config: &DomainConfig) -> Result<String, serde_json::Error> {
    let data = PageData {
        slug_to_page: &config.slug_to_page,
        page_to_slug: config
            .page_to_slug
            .iter()
            .map(|(page, slug)| (page.as_str(), slug.as_str()))
            .collect(),
        slugs: &config.slugs,
        pages: &config.pages,
        domain: &config.domain,
        upstream_site: &config.upstream_site,
    };
    Ok(serde_json::to_string(&data)?.replace("</", "<\\/"))
}

/// The full injection: data block, navigation logic, then the tenant's
/// custom script verbatim.
pub fn body_markup(config: &DomainConfig) -> Result<String, serde_json::Error> {
    let data = page_data_json(config)?;
    let custom = config.custom_script.as_deref().unwrap_or_default();
    Ok(format!(
        "<script>window.__PAGEFRONT__ = {data};\n{NAVIGATION_SCRIPT}</script>{custom}"
    ))
}
