//! llms.txt plugin options.
//!
//! Options are written in TOML with snake_case keys and handed to the
//! plugin as camelCase JSON.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::LlmsError;

/// Directory the plugin writes per-set files to.
const SET_OUTPUT_DIR: &str = "_llms-txt";

/// Options for the llms.txt docs-export plugin.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"), deny_unknown_fields)]
pub struct LlmsTxtConfig {
    /// Project name shown at the top of `llms.txt`.
    pub project_name: String,
    /// One-paragraph summary of the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Extra Markdown shown after the description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Links to resources outside the docs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional_links: Vec<OptionalLink>,
    /// Named subsets of the docs, each written to its own file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_sets: Vec<CustomSet>,
    /// Page globs listed first in generated output, in priority order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub promote: Vec<String>,
    /// Page globs left out of the abridged `llms-small.txt`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

/// A link to an external resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionalLink {
    pub label: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named subset of pages selected by globs.
///
/// Globs match locale-qualified page ids such as `en/reference/os/index`,
/// because the content tree is partitioned by locale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomSet {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub paths: Vec<String>,
}

impl CustomSet {
    /// URL-safe name of the set, used for its output file.
    ///
    /// Lowercases the label and replaces runs of other characters with `-`.
    #[must_use]
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.label.len());
        for c in self.label.chars() {
            if c.is_alphanumeric() {
                slug.extend(c.to_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        slug
    }

    /// Output file of this set.
    #[must_use]
    pub fn output_file(&self) -> String {
        format!("{SET_OUTPUT_DIR}/{}.txt", self.slug())
    }
}

impl LlmsTxtConfig {
    /// Parse options from TOML content.
    ///
    /// # Errors
    ///
    /// Returns [`LlmsError::Parse`] if the TOML is malformed or has unknown keys.
    pub fn from_toml(content: &str) -> Result<Self, LlmsError> {
        toml::from_str(content).map_err(|source| LlmsError::Parse {
            path: None,
            source,
        })
    }

    /// Read options from a file.
    ///
    /// # Errors
    ///
    /// Returns [`LlmsError::Io`] or [`LlmsError::Parse`] naming the file.
    pub fn load(path: &Path) -> Result<Self, LlmsError> {
        tracing::debug!(path = %path.display(), "Loading llms.txt options");
        let content = std::fs::read_to_string(path).map_err(|source| LlmsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| LlmsError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })
    }

    /// Check the options before handing them to the plugin.
    ///
    /// `locales` are the site's locales; a set glob that does not start with
    /// one of them is logged as a warning since it cannot match any page.
    ///
    /// # Errors
    ///
    /// Returns [`LlmsError::Validation`] for missing or duplicate values and
    /// [`LlmsError::Pattern`] for globs that do not compile.
    pub fn validate(&self, locales: &[String]) -> Result<(), LlmsError> {
        if self.project_name.trim().is_empty() {
            return Err(LlmsError::Validation(
                "project_name cannot be empty".to_owned(),
            ));
        }

        for link in &self.optional_links {
            if link.label.trim().is_empty() {
                return Err(LlmsError::Validation(
                    "optional_links entries need a label".to_owned(),
                ));
            }
            if !link.url.starts_with("http://") && !link.url.starts_with("https://") {
                return Err(LlmsError::Validation(format!(
                    "optional link '{}' must use an http:// or https:// URL",
                    link.label
                )));
            }
        }

        let mut slugs = HashSet::new();
        for set in &self.custom_sets {
            let slug = set.slug();
            if slug.is_empty() {
                return Err(LlmsError::Validation(
                    "custom_sets entries need a label".to_owned(),
                ));
            }
            if !slugs.insert(slug) {
                return Err(LlmsError::Validation(format!(
                    "custom set '{}' clashes with another set (both write {})",
                    set.label,
                    set.output_file()
                )));
            }
            if set.paths.is_empty() {
                return Err(LlmsError::Validation(format!(
                    "custom set '{}' needs at least one path",
                    set.label
                )));
            }
            for path in &set.paths {
                compile(path)?;
                if !locales.is_empty() && !has_locale_prefix(path, locales) {
                    tracing::warn!(
                        set = %set.label,
                        path = %path,
                        "Custom set path does not start with a locale; it matches locale-qualified page ids"
                    );
                }
            }
        }

        for pattern in self.promote.iter().chain(&self.exclude) {
            compile(pattern)?;
        }

        Ok(())
    }

    /// Files the plugin generates, relative to the site root.
    #[must_use]
    pub fn output_files(&self) -> Vec<String> {
        ["llms.txt", "llms-full.txt", "llms-small.txt"]
            .into_iter()
            .map(str::to_owned)
            .chain(self.custom_sets.iter().map(CustomSet::output_file))
            .collect()
    }

    /// Plugin options as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Compile a glob, attaching the offending pattern to errors.
pub(crate) fn compile(pattern: &str) -> Result<glob::Pattern, LlmsError> {
    glob::Pattern::new(pattern).map_err(|source| LlmsError::Pattern {
        pattern: pattern.to_owned(),
        source,
    })
}

fn has_locale_prefix(path: &str, locales: &[String]) -> bool {
    locales.iter().any(|locale| {
        path.strip_prefix(locale.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    })
}
