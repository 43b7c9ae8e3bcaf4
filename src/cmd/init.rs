//! `pagefront init`: generate a starter store file.
//!
//! Creates a YAML, JSON, or TOML store file with either a minimal
//! tenant or one that shows every optional field.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::GatewayError;

pub fn execute(args: &InitArgs) -> Result<(), GatewayError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("pagefront.{}", args.format.extension())));

    if output.exists() {
        return Err(GatewayError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format, args.full))?;
    println!("Created {}", output.display());
    Ok(())
}

#[must_use]
pub const fn template(format: &ConfigFormat, full: bool) -> &'static str {
    match (format, full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    }
}

const YAML_MINIMAL: &str = r#"# pagefront store: public hostname -> tenant document

example.com:
  slugToPage:
    "": "0123456789abcdef0123456789abcdef"
"#;

const YAML_FULL: &str = r#"# pagefront store: public hostname -> tenant document
#
# Requests for www.example.com resolve to example.com.

example.com:
  # Slug (path without the leading '/') -> 32 lowercase hex page id.
  # The empty slug is the home page. Order is kept for the sitemap.
  slugToPage:
    "": "0123456789abcdef0123456789abcdef"
    about: "fedcba9876543210fedcba9876543210"

  # Overrides for <title> and the og/twitter meta tags.
  title: "Example"
  description: "Pages about example things"

  # Google Fonts family applied to the whole page.
  font: "Open Sans"

  # Markup appended verbatim after the navigation script.
  customScript: ""

  # Upstream site host for this tenant (defaults to --upstream-site).
  # site: "example.notion.site"
"#;

const JSON_MINIMAL: &str = r#"{
  "example.com": {
    "slugToPage": {
      "": "0123456789abcdef0123456789abcdef"
    }
  }
}
"#;

const JSON_FULL: &str = r#"{
  "example.com": {
    "slugToPage": {
      "": "0123456789abcdef0123456789abcdef",
      "about": "fedcba9876543210fedcba9876543210"
    },
    "title": "Example",
    "description": "Pages about example things",
    "font": "Open Sans",
    "customScript": "",
    "site": "example.notion.site"
  }
}
"#;

const TOML_MINIMAL: &str = r#"# pagefront store: public hostname -> tenant document

["example.com".slugToPage]
"" = "0123456789abcdef0123456789abcdef"
"#;

const TOML_FULL: &str = r#"# pagefront store: public hostname -> tenant document
#
# Requests for www.example.com resolve to example.com.

["example.com"]
title = "Example"
description = "Pages about example things"
font = "Open Sans"
customScript = ""
# site = "example.notion.site"

# Slug (path without the leading '/') -> 32 lowercase hex page id.
["example.com".slugToPage]
"" = "0123456789abcdef0123456789abcdef"
about = "fedcba9876543210fedcba9876543210"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sources::parse_store_str;
    use crate::config::validation::validate;

    fn assert_valid(format: &ConfigFormat) {
        for full in [false, true] {
            let store = parse_store_str(format.extension(), template(format, full), "template")
                .unwrap();
            assert!(validate(&store).is_ok(), "{format:?} full={full}");
            assert!(store.contains_key("example.com"));
        }
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_templates_validate() {
        assert_valid(&ConfigFormat::Yaml);
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_templates_validate() {
        assert_valid(&ConfigFormat::Json);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn toml_templates_validate() {
        assert_valid(&ConfigFormat::Toml);
    }

    #[test]
    fn refuses_to_overwrite() {
        let path = std::env::temp_dir().join(format!("pagefront-init-{}.yaml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "existing").unwrap();
        let args = InitArgs {
            format: ConfigFormat::Yaml,
            output: Some(path.clone()),
            full: false,
        };
        let err = execute(&args).unwrap_err();
        assert!(matches!(err, GatewayError::FileExists { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing");
        std::fs::remove_file(&path).unwrap();
    }
}
