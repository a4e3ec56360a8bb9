//! Sidebar definition files.
//!
//! A sidebar is written as a YAML list of items. Groups name their label
//! either literally (`label`) or through a navigation key (`key`):
//!
//! ```yaml
//! - key: Python
//!   collapsed: true
//!   badge: { text: New, variant: tip }
//!   items:
//!     - label: Introduction
//!       link: /python/introduction/
//!     - label: Examples
//!       autogenerate: { directory: python/examples }
//! ```
//!
//! Every item is checked while it is converted: a group has exactly one of
//! `items` / `autogenerate`, an entry has exactly one of `link` / `slug` and
//! no children. Errors name the offending item by its label path.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::{
    AutogenDirective, Badge, GroupContents, LabelResolver, LinkTarget, NavError, NavigationEntry,
    NavigationGroup, NavigationKey, SidebarBuilder, SidebarItem, SidebarTree,
};

/// Placeholder used in error paths for items without a label or key.
const UNNAMED: &str = "<unnamed>";

/// One sidebar item as written, before its shape is checked.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemDefinition {
    /// Navigation key resolved through the locale dictionaries.
    pub key: Option<NavigationKey>,
    /// Literal label.
    pub label: Option<String>,
    /// Literal translations, merged over resolved ones.
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
    /// Entry target as URL path.
    pub link: Option<String>,
    /// Entry target as content slug.
    pub slug: Option<String>,
    /// Group collapsed flag.
    pub collapsed: Option<bool>,
    /// Badge for groups and entries.
    pub badge: Option<Badge>,
    /// Explicit group children.
    pub items: Option<Vec<ItemDefinition>>,
    /// Group autogeneration directive.
    pub autogenerate: Option<AutogenDirective>,
}

impl ItemDefinition {
    /// Whether this item describes an entry rather than a group.
    #[must_use]
    pub fn is_entry(&self) -> bool {
        self.link.is_some() || self.slug.is_some()
    }

    /// Name used in error paths.
    fn display_name(&self) -> &str {
        self.label
            .as_deref()
            .or(self.key.as_ref().map(NavigationKey::as_str))
            .unwrap_or(UNNAMED)
    }

    /// Convert into a sidebar item, resolving keys with `labels` when given.
    pub(crate) fn into_item(
        self,
        parent: &str,
        labels: Option<&LabelResolver<'_>>,
    ) -> Result<SidebarItem, NavError> {
        if self.is_entry() {
            self.into_entry(parent, labels).map(SidebarItem::Entry)
        } else {
            self.into_group(parent, labels).map(SidebarItem::Group)
        }
    }

    /// Convert into a group.
    pub(crate) fn into_group(
        self,
        parent: &str,
        labels: Option<&LabelResolver<'_>>,
    ) -> Result<NavigationGroup, NavError> {
        let path = child_path(parent, self.display_name());
        let malformed = |reason: &str| NavError::MalformedGroup {
            path: path.clone(),
            reason: reason.to_owned(),
        };

        if self.is_entry() {
            return Err(malformed("sets `link` or `slug`, which only entries may have"));
        }

        let contents = match (self.items, self.autogenerate) {
            (Some(_), Some(_)) => {
                return Err(malformed(
                    "sets both `items` and `autogenerate`; a group needs exactly one",
                ));
            }
            (None, None) => {
                return Err(malformed(
                    "sets neither `items` nor `autogenerate`; a group needs exactly one",
                ));
            }
            (Some(items), None) => GroupContents::Items(
                items
                    .into_iter()
                    .map(|item| item.into_item(&path, labels))
                    .collect::<Result<_, _>>()?,
            ),
            (None, Some(directive)) => {
                GroupContents::Autogenerate(AutogenDirective::new(&directive.directory))
            }
        };

        let (label, translations) = resolve_label(
            self.key.as_ref(),
            self.label,
            self.translations,
            labels,
            malformed,
        )?;

        Ok(NavigationGroup {
            label,
            translations,
            collapsed: self.collapsed.unwrap_or(false),
            badge: self.badge,
            contents,
        })
    }

    /// Convert into an entry.
    pub(crate) fn into_entry(
        self,
        parent: &str,
        labels: Option<&LabelResolver<'_>>,
    ) -> Result<NavigationEntry, NavError> {
        let path = child_path(parent, self.display_name());
        let malformed = |reason: &str| NavError::MalformedEntry {
            path: path.clone(),
            reason: reason.to_owned(),
        };

        if self.items.is_some() || self.autogenerate.is_some() {
            return Err(malformed(
                "sets `items` or `autogenerate`; entries cannot have children",
            ));
        }
        if self.collapsed.is_some() {
            return Err(malformed("sets `collapsed`, which only groups may have"));
        }

        let target = match (self.link, self.slug) {
            (Some(_), Some(_)) => {
                return Err(malformed("sets both `link` and `slug`; an entry needs exactly one"));
            }
            (Some(link), None) => LinkTarget::Link(link),
            (None, Some(slug)) => LinkTarget::Slug(slug),
            (None, None) => return Err(malformed("needs either `link` or `slug`")),
        };

        // Entries do not carry translations in the framework's sidebar shape.
        let (label, _) = resolve_label(
            self.key.as_ref(),
            self.label,
            BTreeMap::new(),
            labels,
            malformed,
        )?;

        Ok(NavigationEntry {
            label,
            target,
            badge: self.badge,
        })
    }
}

/// Pick the label of an item from exactly one of `key` / `label`.
fn resolve_label(
    key: Option<&NavigationKey>,
    label: Option<String>,
    translations: BTreeMap<String, String>,
    labels: Option<&LabelResolver<'_>>,
    malformed: impl Fn(&str) -> NavError,
) -> Result<(String, BTreeMap<String, String>), NavError> {
    match (key, label) {
        (Some(_), Some(_)) => Err(malformed("sets both `key` and `label`")),
        (None, None) => Err(malformed("needs either `key` or `label`")),
        (None, Some(label)) => Ok((label, translations)),
        (Some(key), None) => {
            let resolver = labels.ok_or_else(|| {
                malformed(&format!(
                    "uses navigation key `{key}` where only literal labels are accepted"
                ))
            })?;
            let mut resolved = resolver.resolve(key)?;
            resolved.translations.extend(translations);
            Ok((resolved.label, resolved.translations))
        }
    }
}

/// Label path of a child item.
fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent} > {name}")
    }
}

impl TryFrom<ItemDefinition> for NavigationGroup {
    type Error = NavError;

    fn try_from(item: ItemDefinition) -> Result<Self, Self::Error> {
        item.into_group("", None)
    }
}

impl TryFrom<ItemDefinition> for NavigationEntry {
    type Error = NavError;

    fn try_from(item: ItemDefinition) -> Result<Self, Self::Error> {
        item.into_entry("", None)
    }
}

impl TryFrom<ItemDefinition> for SidebarItem {
    type Error = NavError;

    fn try_from(item: ItemDefinition) -> Result<Self, Self::Error> {
        item.into_item("", None)
    }
}

/// A parsed sidebar definition file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct SidebarDefinition {
    /// Top-level items, in tab order.
    pub items: Vec<ItemDefinition>,
}

impl SidebarDefinition {
    /// Parse a definition from YAML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not describe a list of items.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Read and parse a definition file.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Io`] or [`NavError::Parse`] naming the file.
    pub fn load(path: &Path) -> Result<Self, NavError> {
        tracing::debug!(path = %path.display(), "Loading sidebar definition");
        let content = std::fs::read_to_string(path).map_err(|source| NavError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| NavError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve labels and assemble the sidebar tree.
    ///
    /// Top-level items must be groups; each becomes a tab, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first structural or label error encountered.
    pub fn resolve(self, resolver: &LabelResolver<'_>) -> Result<SidebarTree, NavError> {
        let mut builder = SidebarBuilder::new();
        for item in self.items {
            if item.is_entry() {
                return Err(NavError::MalformedGroup {
                    path: item.display_name().to_owned(),
                    reason: "top-level sidebar items must be groups".to_owned(),
                });
            }
            builder = builder.group(item.into_group("", Some(resolver))?);
        }
        builder.build()
    }
}
