//! Sidebar navigation data model.
//!
//! Serialized values follow the sidebar shape the site framework consumes:
//!
//! ```json
//! { "label": "Reference", "collapsed": true, "autogenerate": { "directory": "reference" } }
//! { "label": "Introduction", "link": "/python/introduction/" }
//! ```
//!
//! Deserialization goes through [`ItemDefinition`] so that a group can never
//! carry both `items` and `autogenerate`, and an entry never carries both
//! `link` and `slug`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::definition::ItemDefinition;

/// Visual style of a badge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Note,
    Tip,
    Caution,
    Danger,
    Success,
    #[default]
    Default,
}

/// Short annotation rendered next to a sidebar label (e.g. "New", "WIP").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Badge {
    /// Badge text.
    pub text: String,
    /// Badge style.
    #[serde(default)]
    pub variant: BadgeVariant,
}

impl Badge {
    pub fn new(text: impl Into<String>, variant: BadgeVariant) -> Self {
        Self {
            text: text.into(),
            variant,
        }
    }
}

/// Where an entry points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkTarget {
    /// URL path or external URL (`/python/introduction/`).
    Link(String),
    /// Content collection slug (`python/introduction`).
    Slug(String),
}

impl LinkTarget {
    /// The target as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Link(s) | Self::Slug(s) => s,
        }
    }
}

/// Instruction for the site framework to build entries from a content directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutogenDirective {
    /// Content directory, relative to the docs root, without surrounding slashes.
    pub directory: String,
}

impl AutogenDirective {
    /// Create a directive, trimming surrounding slashes from `directory`.
    pub fn new(directory: impl AsRef<str>) -> Self {
        Self {
            directory: directory.as_ref().trim_matches('/').to_owned(),
        }
    }
}

/// A single sidebar link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ItemDefinition")]
pub struct NavigationEntry {
    /// Display label.
    pub label: String,
    /// Link target.
    #[serde(flatten)]
    pub target: LinkTarget,
    /// Optional badge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
}

impl NavigationEntry {
    /// Entry linking to a URL path.
    pub fn link(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: LinkTarget::Link(link.into()),
            badge: None,
        }
    }

    /// Entry referencing a content slug.
    pub fn slug(label: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: LinkTarget::Slug(slug.into()),
            badge: None,
        }
    }

    #[must_use]
    pub fn with_badge(mut self, badge: Badge) -> Self {
        self.badge = Some(badge);
        self
    }
}

/// Children of a group: exactly one of an explicit list or a directive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupContents {
    /// Explicit ordered children.
    Items(Vec<SidebarItem>),
    /// Entries derived from a content directory by the site framework.
    Autogenerate(AutogenDirective),
}

impl GroupContents {
    /// Directive contents for `directory`.
    pub fn autogenerate(directory: impl AsRef<str>) -> Self {
        Self::Autogenerate(AutogenDirective::new(directory))
    }
}

/// A labelled group of entries and nested groups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ItemDefinition")]
pub struct NavigationGroup {
    /// Display label in the default locale.
    pub label: String,
    /// Labels for other locales, keyed by locale.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<String, String>,
    /// Whether the group starts collapsed.
    pub collapsed: bool,
    /// Optional badge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    /// Children.
    #[serde(flatten)]
    pub contents: GroupContents,
}

impl NavigationGroup {
    /// Expanded group without translations or badge.
    pub fn new(label: impl Into<String>, contents: GroupContents) -> Self {
        Self {
            label: label.into(),
            translations: BTreeMap::new(),
            collapsed: false,
            badge: None,
            contents,
        }
    }

    /// Complete a [`PartialGroup`] with its label and translations.
    pub fn from_partial(
        label: impl Into<String>,
        translations: BTreeMap<String, String>,
        partial: PartialGroup,
    ) -> Self {
        Self {
            label: label.into(),
            translations,
            collapsed: partial.collapsed,
            badge: partial.badge,
            contents: partial.contents,
        }
    }

    /// Explicit children, or `None` for an autogenerated group.
    #[must_use]
    pub fn items(&self) -> Option<&[SidebarItem]> {
        match &self.contents {
            GroupContents::Items(items) => Some(items),
            GroupContents::Autogenerate(_) => None,
        }
    }

    /// The directive of an autogenerated group.
    #[must_use]
    pub fn autogenerate(&self) -> Option<&AutogenDirective> {
        match &self.contents {
            GroupContents::Items(_) => None,
            GroupContents::Autogenerate(directive) => Some(directive),
        }
    }
}

/// A group definition without its label.
///
/// Input to the label resolver, which supplies the label from the locale
/// dictionaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialGroup {
    pub collapsed: bool,
    pub badge: Option<Badge>,
    pub contents: GroupContents,
}

impl PartialGroup {
    /// Partial group with explicit children.
    pub fn items(items: Vec<SidebarItem>) -> Self {
        Self {
            collapsed: false,
            badge: None,
            contents: GroupContents::Items(items),
        }
    }

    /// Partial group generated from a content directory.
    pub fn autogenerate(directory: impl AsRef<str>) -> Self {
        Self {
            collapsed: false,
            badge: None,
            contents: GroupContents::autogenerate(directory),
        }
    }

    #[must_use]
    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    #[must_use]
    pub fn with_badge(mut self, badge: Badge) -> Self {
        self.badge = Some(badge);
        self
    }
}

/// A child of a group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, try_from = "ItemDefinition")]
pub enum SidebarItem {
    Entry(NavigationEntry),
    Group(NavigationGroup),
}

impl SidebarItem {
    /// Display label of the item.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Entry(entry) => &entry.label,
            Self::Group(group) => &group.label,
        }
    }
}

impl From<NavigationEntry> for SidebarItem {
    fn from(entry: NavigationEntry) -> Self {
        Self::Entry(entry)
    }
}

impl From<NavigationGroup> for SidebarItem {
    fn from(group: NavigationGroup) -> Self {
        Self::Group(group)
    }
}
