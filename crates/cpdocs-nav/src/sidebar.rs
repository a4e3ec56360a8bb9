//! Sidebar tree assembly and validation.
//!
//! The tree is the ordered list of top-level groups handed to the site
//! framework. Order is the tab order of the rendered site and is never
//! changed by assembly.

use serde::{Deserialize, Serialize};

use crate::{
    GroupContents, LabelResolver, LinkTarget, NavError, NavigationEntry, NavigationGroup,
    NavigationKey, PartialGroup, SidebarItem,
};

/// Root of the navigation: top-level groups in tab order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SidebarTree {
    #[serde(deserialize_with = "deserialize_validated")]
    groups: Vec<NavigationGroup>,
}

/// Deserialize top-level groups and run assembly validation over them.
fn deserialize_validated<'de, D>(deserializer: D) -> Result<Vec<NavigationGroup>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let groups = Vec::<NavigationGroup>::deserialize(deserializer)?;
    for group in &groups {
        validate_group(group, "").map_err(serde::de::Error::custom)?;
    }
    Ok(groups)
}

/// A node visited by [`SidebarTree::walk`].
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    Group(&'a NavigationGroup),
    Entry(&'a NavigationEntry),
}

/// A visited node with its position in the tree.
#[derive(Clone, Debug)]
pub struct WalkItem<'a> {
    /// Label path (`HHK > Reference > OS`).
    pub path: String,
    /// Nesting depth; top-level groups are at depth 0.
    pub depth: usize,
    /// The node itself.
    pub node: NodeRef<'a>,
}

impl SidebarTree {
    /// Top-level groups in tab order.
    #[must_use]
    pub fn groups(&self) -> &[NavigationGroup] {
        &self.groups
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every group and entry in depth-first declaration order.
    #[must_use]
    pub fn walk(&self) -> Vec<WalkItem<'_>> {
        let mut out = Vec::new();
        for group in &self.groups {
            walk_group(group, "", 0, &mut out);
        }
        out
    }

    /// Number of explicit entries in the tree.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.walk()
            .iter()
            .filter(|item| matches!(item.node, NodeRef::Entry(_)))
            .count()
    }

    /// Number of groups (top-level and nested).
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.walk()
            .iter()
            .filter(|item| matches!(item.node, NodeRef::Group(_)))
            .count()
    }

    /// Serialize to the JSON shape the site framework consumes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn walk_group<'a>(group: &'a NavigationGroup, parent: &str, depth: usize, out: &mut Vec<WalkItem<'a>>) {
    let path = join_path(parent, &group.label);
    out.push(WalkItem {
        path: path.clone(),
        depth,
        node: NodeRef::Group(group),
    });

    if let GroupContents::Items(items) = &group.contents {
        for item in items {
            match item {
                SidebarItem::Group(child) => walk_group(child, &path, depth + 1, out),
                SidebarItem::Entry(entry) => out.push(WalkItem {
                    path: join_path(&path, &entry.label),
                    depth: depth + 1,
                    node: NodeRef::Entry(entry),
                }),
            }
        }
    }
}

fn join_path(parent: &str, label: &str) -> String {
    if parent.is_empty() {
        label.to_owned()
    } else {
        format!("{parent} > {label}")
    }
}

/// Assembles a [`SidebarTree`] from groups in the order they are added.
///
/// # Example
///
/// ```
/// use cpdocs_nav::{
///     LabelResolver, LocaleDictionary, Locales, NavigationGroup, GroupContents,
///     PartialGroup, SidebarBuilder,
/// };
///
/// let en: LocaleDictionary = [("Misc", "Misc")].into_iter().collect();
/// let locales = Locales::new("en").with_dictionary("en", en);
/// let resolver = LabelResolver::new(&locales);
///
/// let tree = SidebarBuilder::new()
///     .group(NavigationGroup::new("Reference", GroupContents::autogenerate("reference")))
///     .keyed(&resolver, "Misc", PartialGroup::autogenerate("dev"))
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(tree.groups().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct SidebarBuilder {
    groups: Vec<NavigationGroup>,
}

impl SidebarBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a literal group.
    #[must_use]
    pub fn group(mut self, group: NavigationGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Append a group whose label is resolved from `key`.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::MissingLabel`] if the key cannot be resolved.
    pub fn keyed(
        mut self,
        resolver: &LabelResolver<'_>,
        key: impl Into<NavigationKey>,
        partial: PartialGroup,
    ) -> Result<Self, NavError> {
        self.groups.push(resolver.group(&key.into(), partial)?);
        Ok(self)
    }

    /// Validate every group recursively and produce the tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`NavError::MalformedGroup`] or
    /// [`NavError::MalformedEntry`] found, in declaration order.
    pub fn build(self) -> Result<SidebarTree, NavError> {
        for group in &self.groups {
            validate_group(group, "")?;
        }
        tracing::debug!(groups = self.groups.len(), "Assembled sidebar tree");
        Ok(SidebarTree {
            groups: self.groups,
        })
    }
}

/// Check a group and its descendants.
fn validate_group(group: &NavigationGroup, parent: &str) -> Result<(), NavError> {
    let name = if group.label.trim().is_empty() {
        "<unnamed>"
    } else {
        group.label.as_str()
    };
    let path = join_path(parent, name);
    let malformed = |reason: String| NavError::MalformedGroup {
        path: path.clone(),
        reason,
    };

    if group.label.trim().is_empty() {
        return Err(malformed("label cannot be empty".to_owned()));
    }
    if let Some(badge) = &group.badge
        && badge.text.trim().is_empty()
    {
        return Err(malformed("badge text cannot be empty".to_owned()));
    }

    match &group.contents {
        GroupContents::Items(items) => {
            for item in items {
                match item {
                    SidebarItem::Group(child) => validate_group(child, &path)?,
                    SidebarItem::Entry(entry) => validate_entry(entry, &path)?,
                }
            }
        }
        GroupContents::Autogenerate(directive) => {
            if let Some(reason) = directory_problem(&directive.directory) {
                return Err(malformed(format!(
                    "autogenerate directory `{}` {reason}",
                    directive.directory
                )));
            }
        }
    }

    Ok(())
}

/// Describe what is wrong with an autogenerate directory, if anything.
fn directory_problem(directory: &str) -> Option<&'static str> {
    if directory.trim().is_empty() {
        Some("cannot be empty")
    } else if directory.starts_with('/') || directory.ends_with('/') {
        Some("must not start or end with '/'")
    } else if directory.contains('\\') {
        Some("must use '/' separators")
    } else if directory.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        Some("must not contain empty, '.' or '..' segments")
    } else {
        None
    }
}

fn validate_entry(entry: &NavigationEntry, parent: &str) -> Result<(), NavError> {
    let path = join_path(parent, &entry.label);
    let malformed = |reason: &str| NavError::MalformedEntry {
        path: path.clone(),
        reason: reason.to_owned(),
    };

    if entry.label.trim().is_empty() {
        return Err(malformed("label cannot be empty"));
    }
    match &entry.target {
        LinkTarget::Link(link) if link.trim().is_empty() => Err(malformed("link cannot be empty")),
        LinkTarget::Slug(slug) if slug.trim().is_empty() => Err(malformed("slug cannot be empty")),
        LinkTarget::Slug(slug) if slug.starts_with('/') => {
            Err(malformed("slug must be relative to the docs root"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Badge, BadgeVariant, LocaleDictionary, Locales};
    use pretty_assertions::assert_eq;

    static_assertions::assert_impl_all!(SidebarTree: Send, Sync);

    fn sample_tree() -> SidebarTree {
        SidebarBuilder::new()
            .group(NavigationGroup::new(
                "HHK",
                GroupContents::Items(vec![
                    NavigationGroup::new(
                        "Get Started",
                        GroupContents::Items(vec![
                            NavigationEntry::link("Introduction", "/getting-started/introduction/")
                                .into(),
                            NavigationEntry::link("Building", "/getting-started/building/").into(),
                        ]),
                    )
                    .into(),
                    NavigationGroup::new("Tutorials", GroupContents::autogenerate("tutorials"))
                        .into(),
                ]),
            ))
            .group(NavigationGroup::new(
                "Misc",
                GroupContents::autogenerate("dev"),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_preserves_order() {
        let tree = sample_tree();
        let labels: Vec<_> = tree.groups().iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["HHK", "Misc"]);
    }

    #[test]
    fn test_keyed_group_resolves_label() {
        let en: LocaleDictionary = [("HHK", "Get Started Kit")].into_iter().collect();
        let locales = Locales::new("en").with_dictionary("en", en);
        let resolver = LabelResolver::new(&locales);

        let tree = SidebarBuilder::new()
            .keyed(&resolver, "HHK", PartialGroup::items(Vec::new()).collapsed(true))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(tree.groups()[0].label, "Get Started Kit");
        assert!(tree.groups()[0].collapsed);
    }

    #[test]
    fn test_walk_depth_first_with_paths() {
        let tree = sample_tree();

        let visited: Vec<_> = tree
            .walk()
            .into_iter()
            .map(|item| (item.path, item.depth))
            .collect();

        assert_eq!(
            visited,
            vec![
                ("HHK".to_owned(), 0),
                ("HHK > Get Started".to_owned(), 1),
                ("HHK > Get Started > Introduction".to_owned(), 2),
                ("HHK > Get Started > Building".to_owned(), 2),
                ("HHK > Tutorials".to_owned(), 1),
                ("Misc".to_owned(), 0),
            ]
        );
        assert_eq!(tree.entry_count(), 2);
        assert_eq!(tree.group_count(), 4);
    }

    #[test]
    fn test_empty_label_rejected() {
        let err = SidebarBuilder::new()
            .group(NavigationGroup::new(" ", GroupContents::autogenerate("dev")))
            .build()
            .unwrap_err();
        assert!(matches!(err, NavError::MalformedGroup { ref path, .. } if path == "<unnamed>"));
    }

    #[test]
    fn test_empty_badge_rejected() {
        let mut group = NavigationGroup::new("Dev", GroupContents::autogenerate("dev"));
        group.badge = Some(Badge::new("", BadgeVariant::Caution));

        let err = SidebarBuilder::new().group(group).build().unwrap_err();
        assert!(err.to_string().contains("badge"));
    }

    #[test]
    fn test_bad_autogenerate_directories_rejected() {
        for directory in ["", "../secrets", "reference//os", "reference\\os"] {
            let group = NavigationGroup {
                contents: GroupContents::Autogenerate(crate::AutogenDirective {
                    directory: directory.to_owned(),
                }),
                ..NavigationGroup::new("Reference", GroupContents::Items(Vec::new()))
            };
            let result = SidebarBuilder::new().group(group).build();
            assert!(result.is_err(), "Expected `{directory}` to be rejected");
        }
    }

    #[test]
    fn test_nested_entry_validation() {
        let err = SidebarBuilder::new()
            .group(NavigationGroup::new(
                "Python",
                GroupContents::Items(vec![NavigationEntry::slug("Intro", "/python/intro").into()]),
            ))
            .build()
            .unwrap_err();

        assert!(
            matches!(err, NavError::MalformedEntry { ref path, .. } if path == "Python > Intro")
        );
    }

    #[test]
    fn test_empty_tree() {
        let tree = SidebarBuilder::new().build().unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.to_json().unwrap(), "[]");
        assert!(!sample_tree().is_empty());
    }

    #[test]
    fn test_json_round_trip_is_stable() {
        let tree = sample_tree();

        let json = tree.to_json().unwrap();
        let parsed: SidebarTree = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, tree);
        assert_eq!(parsed.to_json().unwrap(), json);
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let result: Result<SidebarTree, _> = serde_json::from_str(
            r#"[{ "label": "Dev", "collapsed": false, "autogenerate": { "directory": "../dev" } }]"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_building_twice_yields_identical_output() {
        assert_eq!(
            sample_tree().to_json().unwrap(),
            sample_tree().to_json().unwrap()
        );
    }
}
