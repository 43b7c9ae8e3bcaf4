//! Markup appended to `head`: the optional web font and the style block
//! that hides the origin's top navigation.

use crate::config::model::DomainConfig;

const HIDE_TOPBAR_STYLE: &str = "<style>\
div.notion-topbar, div.notion-topbar-mobile { display: none !important; }\
div.notion-topbar > div > div:nth-child(1n).toggle-mode,\
div.notion-topbar-mobile > div:nth-child(1n).toggle-mode { display: block !important; }\
</style>";

/// Only the first space becomes `+`; multi-space family names keep the rest.
#[must_use]
pub fn font_stylesheet_url(font: &str) -> String {
    format!(
        "https://fonts.googleapis.com/css?family={}:Regular,Bold,Italic&display=swap",
        font.replacen(' ', "+", 1)
    )
}

#[must_use]
pub fn head_markup(config: &DomainConfig) -> String {
    let mut markup = String::new();
    if let Some(font) = config.font.as_deref() {
        markup.push_str(&format!(
            r#"<link href="{}" rel="stylesheet"><style>* {{ font-family: "{font}" !important; }}</style>"#,
            font_stylesheet_url(font).replace('&', "&amp;")
        ));
    }
    markup.push_str(HIDE_TOPBAR_STYLE);
    markup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::TenantDocument;

    fn config(font: Option<&str>) -> DomainConfig {
        let doc = TenantDocument {
            font: font.map(String::from),
            ..TenantDocument::default()
        };
        DomainConfig::from_document("example.com", doc, "acme.notion.site")
    }

    #[test]
    fn only_first_space_is_escaped() {
        assert_eq!(
            font_stylesheet_url("Source Sans Pro"),
            "https://fonts.googleapis.com/css?family=Source+Sans Pro:Regular,Bold,Italic&display=swap"
        );
    }

    #[test]
    fn font_link_and_style_when_configured() {
        let markup = head_markup(&config(Some("Open Sans")));
        assert!(markup.starts_with(
            "<link href=\"https://fonts.googleapis.com/css?family=Open+Sans:Regular,Bold,Italic&amp;display=swap\" rel=\"stylesheet\">"
        ));
        assert!(markup.contains(r#"* { font-family: "Open Sans" !important; }"#));
        assert!(markup.ends_with(HIDE_TOPBAR_STYLE));
    }

    #[test]
    fn topbar_style_without_font() {
        let markup = head_markup(&config(None));
        assert_eq!(markup, HIDE_TOPBAR_STYLE);
        assert!(markup.contains("div.notion-topbar, div.notion-topbar-mobile { display: none !important; }"));
        assert!(markup.contains(".toggle-mode { display: block !important; }"));
        assert!(!markup.contains("nth-child(3)"));
    }
}
