//! Site configuration management for cpdocs.
//!
//! Parses `cpdocs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.url`
//! - `site.edit_link_base`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content directory.
    pub content_dir: Option<PathBuf>,
    /// Override default locale.
    pub default_locale: Option<String>,
    /// Override site base path.
    pub base: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "cpdocs.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site metadata handed to the site framework.
    pub site: SiteConfig,
    /// Locale configuration.
    pub i18n: I18nConfig,
    /// Documentation paths (relative strings from TOML).
    docs: DocsConfigRaw,
    /// Docs-export plugin settings (relative strings from TOML).
    llms_txt: LlmsTxtConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved docs-export settings (set after loading).
    #[serde(skip)]
    pub llms_txt_resolved: LlmsTxtSettings,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site metadata.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public URL the site is deployed to.
    pub url: Option<String>,
    /// Base path the site is served under.
    pub base: String,
    /// Site title.
    pub title: String,
    /// Site description for metadata.
    pub description: Option<String>,
    /// Logo asset path.
    pub logo: Option<String>,
    /// Favicon asset path.
    pub favicon: Option<String>,
    /// Base URL for "edit this page" links.
    pub edit_link_base: Option<String>,
    /// Show the last-updated date on pages.
    pub last_updated: bool,
    /// Social links keyed by platform name.
    pub social: BTreeMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: None,
            base: "/".to_owned(),
            title: "Documentation".to_owned(),
            description: None,
            logo: None,
            favicon: None,
            edit_link_base: None,
            last_updated: false,
            social: BTreeMap::new(),
        }
    }
}

/// Locale configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Locale used for labels when no other locale is requested.
    pub default_locale: String,
    /// All supported locales.
    pub locales: Vec<String>,
    /// Extra fallback locales consulted before the default locale.
    pub fallback: BTreeMap<String, Vec<String>>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_owned(),
            locales: vec!["en".to_owned()],
            fallback: BTreeMap::new(),
        }
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    content_dir: Option<String>,
    nav_dir: Option<String>,
    sidebar: Option<String>,
    locale_prefixed: Option<bool>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Content tree scanned for link checks.
    pub content_dir: PathBuf,
    /// Directory holding `<locale>.yaml` navigation dictionaries.
    pub nav_dir: PathBuf,
    /// Sidebar definition file.
    pub sidebar_path: PathBuf,
    /// Whether the content tree is partitioned by locale (`<locale>/...`).
    pub locale_prefixed: bool,
}

/// Raw docs-export configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct LlmsTxtConfigRaw {
    config: Option<String>,
    enabled: Option<bool>,
}

/// Resolved docs-export settings.
#[derive(Debug, Default)]
pub struct LlmsTxtSettings {
    /// Plugin configuration file.
    pub config_path: PathBuf,
    /// Whether the plugin is enabled.
    pub enabled: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl I18nConfig {
    /// Check whether `locale` is one of the supported locales.
    #[must_use]
    pub fn is_known(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }

    /// Locales other than the default, in declaration order.
    pub fn secondary_locales(&self) -> impl Iterator<Item = &str> {
        self.locales
            .iter()
            .map(String::as_str)
            .filter(|l| *l != self.default_locale)
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `cpdocs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The result is
    /// validated after overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(content_dir) = &settings.content_dir {
            self.docs_resolved.content_dir.clone_from(content_dir);
        }
        if let Some(locale) = &settings.default_locale {
            self.i18n.default_locale.clone_from(locale);
        }
        if let Some(base) = &settings.base {
            self.site.base.clone_from(base);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            site: SiteConfig::default(),
            i18n: I18nConfig::default(),
            docs: DocsConfigRaw::default(),
            llms_txt: LlmsTxtConfigRaw::default(),
            docs_resolved: DocsConfig::default(),
            llms_txt_resolved: LlmsTxtSettings::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "Loading configuration");
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_i18n()?;
        Ok(())
    }

    /// Validate site metadata.
    fn validate_site(&self) -> Result<(), ConfigError> {
        let site = &self.site;
        require_non_empty(&site.title, "site.title")?;

        if let Some(url) = &site.url {
            require_http_url(url, "site.url")?;
        }
        if let Some(edit) = &site.edit_link_base {
            require_http_url(edit, "site.edit_link_base")?;
        }
        if !site.base.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "site.base must start with '/', got '{}'",
                site.base
            )));
        }
        for (name, url) in &site.social {
            require_http_url(url, &format!("site.social.{name}"))?;
        }

        Ok(())
    }

    /// Validate locale configuration.
    fn validate_i18n(&self) -> Result<(), ConfigError> {
        let i18n = &self.i18n;
        if i18n.locales.is_empty() {
            return Err(ConfigError::Validation(
                "i18n.locales must list at least one locale".to_owned(),
            ));
        }
        for locale in &i18n.locales {
            require_non_empty(locale, "i18n.locales")?;
        }
        if !i18n.is_known(&i18n.default_locale) {
            return Err(ConfigError::Validation(format!(
                "i18n.default_locale '{}' is not listed in i18n.locales",
                i18n.default_locale
            )));
        }

        for (locale, chain) in &i18n.fallback {
            if !i18n.is_known(locale) {
                return Err(ConfigError::Validation(format!(
                    "i18n.fallback.{locale} refers to an unknown locale"
                )));
            }
            for target in chain {
                if target == locale {
                    return Err(ConfigError::Validation(format!(
                        "i18n.fallback.{locale} cannot fall back to itself"
                    )));
                }
                if !i18n.is_known(target) {
                    return Err(ConfigError::Validation(format!(
                        "i18n.fallback.{locale} lists unknown locale '{target}'"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_setting(&mut self.site.url, "site.url")?;
        expand::expand_setting(&mut self.site.edit_link_base, "site.edit_link_base")
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            content_dir: resolve(self.docs.content_dir.as_deref(), "src/content/docs"),
            nav_dir: resolve(self.docs.nav_dir.as_deref(), "nav"),
            sidebar_path: resolve(self.docs.sidebar.as_deref(), "sidebar.yaml"),
            locale_prefixed: self.docs.locale_prefixed.unwrap_or(true),
        };

        self.llms_txt_resolved = LlmsTxtSettings {
            config_path: resolve(self.llms_txt.config.as_deref(), "llms-txt.toml"),
            enabled: self.llms_txt.enabled.unwrap_or(true),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site.base, "/");
        assert_eq!(config.site.title, "Documentation");
        assert_eq!(config.i18n.default_locale, "en");
        assert_eq!(config.i18n.locales, vec!["en".to_owned()]);
        assert_eq!(
            config.docs_resolved.content_dir,
            PathBuf::from("/test/src/content/docs")
        );
        assert_eq!(config.docs_resolved.nav_dir, PathBuf::from("/test/nav"));
        assert_eq!(
            config.docs_resolved.sidebar_path,
            PathBuf::from("/test/sidebar.yaml")
        );
        assert!(config.docs_resolved.locale_prefixed);
        assert_eq!(
            config.llms_txt_resolved.config_path,
            PathBuf::from("/test/llms-txt.toml")
        );
        assert!(config.llms_txt_resolved.enabled);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site.title, "Documentation");
        assert_eq!(config.i18n.default_locale, "en");
    }

    #[test]
    fn test_parse_site_config() {
        let toml = r#"
[site]
url = "https://classpaddev.github.io/wiki"
base = "/wiki"
title = "Classpad Dev"
description = "Dive into the Classpad II fx-CP400!"
logo = "./src/assets/favicon.png"
favicon = "./src/assets/favicon.png"
edit_link_base = "https://github.com/classpaddev/wiki/edit/main/"
last_updated = true

[site.social]
github = "https://github.com/classpaddev/wiki"
discord = "https://discord.gg/knpcNJTzpd"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.site.url.as_deref(),
            Some("https://classpaddev.github.io/wiki")
        );
        assert_eq!(config.site.base, "/wiki");
        assert_eq!(config.site.title, "Classpad Dev");
        assert!(config.site.last_updated);
        assert_eq!(config.site.social.len(), 2);
        assert_eq!(
            config.site.social["discord"],
            "https://discord.gg/knpcNJTzpd"
        );
    }

    #[test]
    fn test_parse_i18n_config() {
        let toml = r#"
[i18n]
default_locale = "en"
locales = ["en", "fr", "de"]

[i18n.fallback]
de = ["fr"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.i18n.locales, vec!["en", "fr", "de"]);
        assert_eq!(config.i18n.fallback["de"], vec!["fr".to_owned()]);
        let secondary: Vec<_> = config.i18n.secondary_locales().collect();
        assert_eq!(secondary, vec!["fr", "de"]);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
content_dir = "content"
nav_dir = "labels"
sidebar = "nav/sidebar.yaml"
locale_prefixed = false

[llms_txt]
config = "plugins/llms.toml"
enabled = false
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.content_dir,
            PathBuf::from("/project/content")
        );
        assert_eq!(config.docs_resolved.nav_dir, PathBuf::from("/project/labels"));
        assert_eq!(
            config.docs_resolved.sidebar_path,
            PathBuf::from("/project/nav/sidebar.yaml")
        );
        assert!(!config.docs_resolved.locale_prefixed);
        assert_eq!(
            config.llms_txt_resolved.config_path,
            PathBuf::from("/project/plugins/llms.toml")
        );
        assert!(!config.llms_txt_resolved.enabled);
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[site]\ntitle = \"Classpad Dev\"\n\n[docs]\ncontent_dir = \"docs\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.site.title, "Classpad Dev");
        assert_eq!(
            config.docs_resolved.content_dir,
            temp_dir.path().join("docs")
        );
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/cpdocs.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_validates_after_overrides() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[i18n]\nlocales = [\"en\", \"fr\"]\n").unwrap();

        let overrides = CliSettings {
            default_locale: Some("de".to_owned()),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("'de'"));
    }

    #[test]
    fn test_apply_cli_settings_content_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            content_dir: Some(PathBuf::from("/custom/docs")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.docs_resolved.content_dir,
            PathBuf::from("/custom/docs")
        );
        assert_eq!(config.docs_resolved.nav_dir, PathBuf::from("/test/nav")); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_base_and_locale() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            base: Some("/wiki".to_owned()),
            default_locale: Some("fr".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.site.base, "/wiki");
        assert_eq!(config.i18n.default_locale, "fr");
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.site.base, before.site.base);
        assert_eq!(config.i18n.default_locale, before.i18n.default_locale);
        assert_eq!(
            config.docs_resolved.content_dir,
            before.docs_resolved.content_dir
        );
    }

    #[test]
    fn test_expand_env_vars_site_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CPDOCS_TEST_URL", "https://docs.example.com");
        }

        let toml = r#"
[site]
url = "${CPDOCS_TEST_URL}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.site.url.as_deref(), Some("https://docs.example.com"));

        unsafe {
            std::env::remove_var("CPDOCS_TEST_URL");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("CPDOCS_MISSING_EDIT_URL");
        }

        let toml = r#"
[site]
edit_link_base = "${CPDOCS_MISSING_EDIT_URL}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("site.edit_link_base"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_title_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.title = "  ".to_owned();
        assert_validation_error(&config, &["site.title", "empty"]);
    }

    #[test]
    fn test_validate_site_url_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.url = Some("classpaddev.github.io/wiki".to_owned());
        assert_validation_error(&config, &["site.url", "http"]);
    }

    #[test]
    fn test_validate_base_must_be_absolute() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.base = "wiki".to_owned();
        assert_validation_error(&config, &["site.base", "'/'"]);
    }

    #[test]
    fn test_validate_social_url() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config
            .site
            .social
            .insert("discord".to_owned(), "discord.gg/abc".to_owned());
        assert_validation_error(&config, &["site.social.discord"]);
    }

    #[test]
    fn test_validate_default_locale_must_be_listed() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.i18n.default_locale = "fr".to_owned();
        assert_validation_error(&config, &["default_locale", "'fr'"]);
    }

    #[test]
    fn test_validate_empty_locales() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.i18n.locales.clear();
        assert_validation_error(&config, &["at least one locale"]);
    }

    #[test]
    fn test_validate_fallback_unknown_target() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.i18n.locales.push("fr".to_owned());
        config
            .i18n
            .fallback
            .insert("fr".to_owned(), vec!["de".to_owned()]);
        assert_validation_error(&config, &["i18n.fallback.fr", "'de'"]);
    }

    #[test]
    fn test_validate_fallback_to_itself() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.i18n.locales.push("fr".to_owned());
        config
            .i18n
            .fallback
            .insert("fr".to_owned(), vec!["fr".to_owned()]);
        assert_validation_error(&config, &["itself"]);
    }

    #[test]
    fn test_validate_fallback_unknown_source() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config
            .i18n
            .fallback
            .insert("ja".to_owned(), vec!["en".to_owned()]);
        assert_validation_error(&config, &["i18n.fallback.ja", "unknown"]);
    }
}
