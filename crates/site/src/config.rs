//! Site configuration (`leaf.config.yaml` / `.yml` / `.json`).

use crate::error::SiteError;
use crate::navigation::SidebarConfig;
use leaf_render::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names, in lookup order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["leaf.config.yaml", "leaf.config.yml", "leaf.config.json"];

/// Site configuration. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeafConfig {
    /// Site title, appended to page titles.
    pub title: String,
    /// Fallback page description.
    pub description: String,
    /// Base URL the site is served from.
    pub base: String,
    /// Layout and navigation.
    pub theme: ThemeConfig,
    /// Markdown rendering switches.
    pub markdown: MarkdownConfig,
}

impl Default for LeafConfig {
    fn default() -> Self {
        Self {
            title: "Leaf".to_string(),
            description: "A documentation site built with Leaf".to_string(),
            base: "/".to_string(),
            theme: ThemeConfig::default(),
            markdown: MarkdownConfig::default(),
        }
    }
}

impl LeafConfig {
    /// First config file present in `root`.
    pub fn find(root: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
    }

    /// Reads a config file; `.json` files are JSON, anything else YAML.
    pub fn from_path(path: &Path) -> Result<Self, SiteError> {
        let content = std::fs::read_to_string(path).map_err(|source| SiteError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |message: String| SiteError::ConfigParse {
            path: path.to_path_buf(),
            message,
        };

        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            serde_json::from_str(&content).map_err(|err| parse_error(err.to_string()))
        } else if content.trim().is_empty() {
            Ok(Self::default())
        } else {
            serde_yaml::from_str(&content).map_err(|err| parse_error(err.to_string()))
        }
    }

    /// Loads the config in `root`, falling back to the default.
    ///
    /// A missing file is not an error. A broken one is logged and ignored.
    pub fn load(root: &Path) -> Self {
        let Some(path) = Self::find(root) else {
            log::debug!("No config file in {}, using defaults", root.display());
            return Self::default();
        };
        match Self::from_path(&path) {
            Ok(config) => {
                log::debug!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("{}; using the default configuration", err);
                Self::default()
            }
        }
    }
}

/// Theme settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeConfig {
    /// Top navigation links.
    pub nav: Vec<NavItem>,
    /// Sidebar, global or keyed by URL prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<SidebarConfig>,
    /// Logo image path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Links shown as icons in the header.
    pub social_links: Vec<SocialLink>,
    /// "Edit this page" link settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_link: Option<EditLinkConfig>,
    /// Show each page's git last-updated time.
    pub last_updated: bool,
}

/// A top navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Label.
    pub text: String,
    /// Target.
    pub link: String,
}

/// Supported social icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialIcon {
    /// GitHub
    Github,
    /// Twitter
    Twitter,
    /// Discord
    Discord,
}

/// A social link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// Icon to show.
    pub icon: SocialIcon,
    /// Target URL.
    pub link: String,
}

/// Edit link settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditLinkConfig {
    /// URL pattern with a `:path` placeholder for the page's path under `docs/`.
    pub pattern: String,
    /// Link text.
    #[serde(default = "default_edit_link_text")]
    pub text: String,
}

fn default_edit_link_text() -> String {
    "Edit this page".to_string()
}

/// Markdown settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkdownConfig {
    /// Number every code block line.
    pub line_numbers: bool,
    /// Parse and render `$..$` math.
    pub math: bool,
    /// Add copy buttons to code blocks.
    pub copy_code: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            line_numbers: false,
            math: true,
            copy_code: false,
        }
    }
}

impl MarkdownConfig {
    /// Processor options for these settings.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            math: self.math,
            line_numbers: self.line_numbers,
            copy_code: self.copy_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::SidebarItem;
    use std::fs;

    #[test]
    fn yaml_config_with_partial_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("leaf.config.yaml"),
            "title: My Docs\ntheme:\n  sidebar:\n    - text: Intro\n      link: /intro\n  socialLinks:\n    - icon: github\n      link: https://github.com/leaf\n  editLink:\n    pattern: https://example.com/:path\nmarkdown:\n  lineNumbers: true\n",
        )
        .expect("write");

        let config = LeafConfig::load(dir.path());
        assert_eq!(config.title, "My Docs");
        assert_eq!(config.base, "/");
        assert_eq!(config.description, "A documentation site built with Leaf");
        assert_eq!(
            config.theme.sidebar,
            Some(SidebarConfig::Global(vec![SidebarItem::link("Intro", "/intro")]))
        );
        assert_eq!(config.theme.social_links[0].icon, SocialIcon::Github);
        assert_eq!(
            config.theme.edit_link.as_ref().map(|edit| edit.text.as_str()),
            Some("Edit this page")
        );
        assert_eq!(
            config.markdown.render_options(),
            RenderOptions {
                math: true,
                line_numbers: true,
                copy_code: false,
            }
        );
    }

    #[test]
    fn json_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("leaf.config.json"),
            r#"{"title": "Json Docs", "markdown": {"math": false}}"#,
        )
        .expect("write");
        let config = LeafConfig::load(dir.path());
        assert_eq!(config.title, "Json Docs");
        assert!(!config.markdown.math);
    }

    #[test]
    fn yaml_takes_precedence_over_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("leaf.config.json"), r#"{"title": "Json"}"#).expect("write");
        fs::write(dir.path().join("leaf.config.yml"), "title: Yml\n").expect("write");
        assert_eq!(LeafConfig::load(dir.path()).title, "Yml");
    }

    #[test]
    fn missing_or_broken_config_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(LeafConfig::load(dir.path()), LeafConfig::default());

        let path = dir.path().join("leaf.config.yaml");
        fs::write(&path, "title: [unclosed\n").expect("write");
        assert_eq!(LeafConfig::load(dir.path()), LeafConfig::default());
        assert!(matches!(
            LeafConfig::from_path(&path),
            Err(SiteError::ConfigParse { .. })
        ));
    }

    #[test]
    fn unknown_social_icon_is_rejected() {
        let result: Result<SocialLink, _> =
            serde_yaml::from_str("icon: myspace\nlink: https://example.com\n");
        assert!(result.is_err());
    }
}
