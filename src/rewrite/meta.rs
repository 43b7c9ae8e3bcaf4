//! `title` and `meta` element rules.

use crate::config::model::DomainConfig;

/// What to do with one `meta` element.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MetaRewrite {
    pub content: Option<String>,
    pub remove: bool,
}

/// Decide the rewrite for a `meta` element from its `name` and `property`
/// attributes. Rules run in order and the last applicable `content` wins.
#[must_use]
pub fn meta_rewrite(
    name: Option<&str>,
    property: Option<&str>,
    config: &DomainConfig,
) -> MetaRewrite {
    let mut rewrite = MetaRewrite::default();

    if let Some(title) = config.title.as_deref() {
        if property == Some("og:title") || name == Some("twitter:title") {
            rewrite.content = Some(title.to_string());
        }
    }

    if let Some(description) = config.description.as_deref() {
        if name == Some("description")
            || property == Some("og:description")
            || name == Some("twitter:description")
        {
            rewrite.content = Some(description.to_string());
        }
    }

    if property == Some("og:url") || name == Some("twitter:url") {
        rewrite.content = Some(config.domain.clone());
    }

    if name == Some("apple-itunes-app") {
        rewrite.remove = true;
    }

    rewrite
}

/// Replacement text for the document `title`, if one is configured.
#[must_use]
pub fn title_text(config: &DomainConfig) -> Option<&str> {
    config.title.as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::TenantDocument;

    fn config(title: Option<&str>, description: Option<&str>) -> DomainConfig {
        let doc = TenantDocument {
            title: title.map(String::from),
            description: description.map(String::from),
            ..TenantDocument::default()
        };
        DomainConfig::from_document("example.com", doc, "acme.notion.site")
    }

    #[test]
    fn title_rules() {
        let c = config(Some("Acme"), None);
        assert_eq!(
            meta_rewrite(None, Some("og:title"), &c).content.as_deref(),
            Some("Acme")
        );
        assert_eq!(
            meta_rewrite(Some("twitter:title"), None, &c).content.as_deref(),
            Some("Acme")
        );
        assert_eq!(meta_rewrite(Some("og:title"), None, &c).content, None);
    }

    #[test]
    fn description_rules() {
        let c = config(None, Some("Things"));
        for (name, property) in [
            (Some("description"), None),
            (None, Some("og:description")),
            (Some("twitter:description"), None),
        ] {
            assert_eq!(
                meta_rewrite(name, property, &c).content.as_deref(),
                Some("Things")
            );
        }
    }

    #[test]
    fn unset_values_leave_content_alone() {
        let c = config(None, None);
        assert_eq!(meta_rewrite(None, Some("og:title"), &c), MetaRewrite::default());
        assert_eq!(
            meta_rewrite(Some("description"), None, &c),
            MetaRewrite::default()
        );
        assert_eq!(title_text(&c), None);
    }

    #[test]
    fn url_rules_always_apply() {
        let c = config(None, None);
        assert_eq!(
            meta_rewrite(None, Some("og:url"), &c).content.as_deref(),
            Some("example.com")
        );
        assert_eq!(
            meta_rewrite(Some("twitter:url"), None, &c).content.as_deref(),
            Some("example.com")
        );
    }

    #[test]
    fn app_banner_is_removed() {
        let rewrite = meta_rewrite(Some("apple-itunes-app"), None, &config(None, None));
        assert!(rewrite.remove);
    }

    #[test]
    fn later_rule_wins() {
        let c = config(Some("Acme"), Some("Things"));
        let rewrite = meta_rewrite(Some("description"), Some("og:title"), &c);
        assert_eq!(rewrite.content.as_deref(), Some("Things"));
    }
}
