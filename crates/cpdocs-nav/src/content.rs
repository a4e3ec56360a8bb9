//! Content page discovery and sidebar link checking.
//!
//! [`ContentIndex`] walks the docs content directory and records one page id
//! per Markdown file. Ids are relative paths without extension, with `index`
//! files collapsing onto their directory:
//!
//! | File | Page id |
//! |------|---------|
//! | `en/python/introduction.md` | `en/python/introduction` |
//! | `en/reference/os/index.mdx` | `en/reference/os` |
//! | `en/index.md` | `en` |
//!
//! The content tree is partitioned by locale, so ids of a locale-prefixed
//! tree start with `<locale>/`. [`ContentIndex::for_locale`] strips that
//! prefix to match the locale-neutral links used in the sidebar.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::{GroupContents, LinkTarget, NavError, SidebarTree};
use crate::sidebar::NodeRef;

/// Extensions recognized as content pages.
const PAGE_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Set of page ids present in the content tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentIndex {
    pages: BTreeSet<String>,
}

impl ContentIndex {
    /// Walk `dir` and index every content page.
    ///
    /// Returns an empty index if the directory doesn't exist. Hidden files
    /// and directories are skipped.
    pub fn scan(dir: &Path) -> Self {
        let mut pages = BTreeSet::new();
        if dir.exists() {
            scan_directory(dir, "", &mut pages);
        }
        tracing::debug!(dir = %dir.display(), pages = pages.len(), "Indexed content pages");
        Self { pages }
    }

    /// Index built from known page ids.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
        }
    }

    /// The partition of one locale, with the `<locale>/` prefix removed.
    #[must_use]
    pub fn for_locale(&self, locale: &str) -> Self {
        let prefix = format!("{locale}/");
        let pages = self
            .pages
            .iter()
            .filter_map(|page| {
                if page == locale {
                    Some(String::new())
                } else {
                    page.strip_prefix(&prefix).map(str::to_owned)
                }
            })
            .collect();
        Self { pages }
    }

    /// Check whether a page id exists.
    #[must_use]
    pub fn contains(&self, page: &str) -> bool {
        self.pages.contains(page)
    }

    /// Check whether any page lives in `directory` or below it.
    #[must_use]
    pub fn has_pages_under(&self, directory: &str) -> bool {
        let prefix = format!("{directory}/");
        self.pages
            .iter()
            .any(|page| page == directory || page.starts_with(&prefix))
    }

    /// Page ids in sorted order.
    pub fn pages(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Recursively collect page ids below `dir`.
fn scan_directory(dir: &Path, prefix: &str, pages: &mut BTreeSet<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
        if is_dir {
            scan_directory(&path, &join_id(prefix, &name), pages);
            continue;
        }

        let is_page = path
            .extension()
            .is_some_and(|ext| PAGE_EXTENSIONS.iter().any(|p| ext == *p));
        if !is_page {
            continue;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let id = if stem == "index" {
            prefix.to_owned()
        } else {
            join_id(prefix, &stem)
        };
        pages.insert(id);
    }
}

fn join_id(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Convert a sidebar link to a page id.
///
/// Returns `None` for external links, which are not checked. The site
/// `base` (e.g. `/wiki`) is stripped when present, along with anchors,
/// query strings and surrounding slashes.
#[must_use]
pub fn link_to_page_id(link: &str, base: &str) -> Option<String> {
    if link.contains("://") || link.starts_with("//") || link.starts_with("mailto:") {
        return None;
    }

    let path = link.split(['#', '?']).next().unwrap_or_default();
    let base = base.trim_end_matches('/');
    let path = if base.is_empty() {
        path
    } else {
        match path.strip_prefix(base) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        }
    };

    Some(path.trim_matches('/').to_owned())
}

impl SidebarTree {
    /// Check every link, slug and autogenerate directory against `index`.
    ///
    /// `index` must hold locale-neutral page ids (see
    /// [`ContentIndex::for_locale`]). All problems are returned so a single
    /// run reports every broken link.
    #[must_use]
    pub fn check_content(&self, index: &ContentIndex, base: &str) -> Vec<NavError> {
        let mut problems = Vec::new();

        for item in self.walk() {
            match item.node {
                NodeRef::Entry(entry) => {
                    let page = match &entry.target {
                        LinkTarget::Link(link) => link_to_page_id(link, base),
                        LinkTarget::Slug(slug) => Some(slug.trim_matches('/').to_owned()),
                    };
                    if let Some(page) = page
                        && !index.contains(&page)
                    {
                        problems.push(NavError::BrokenLink {
                            path: item.path,
                            target: entry.target.as_str().to_owned(),
                        });
                    }
                }
                NodeRef::Group(group) => {
                    if let GroupContents::Autogenerate(directive) = &group.contents
                        && !index.has_pages_under(&directive.directory)
                    {
                        problems.push(NavError::EmptyAutogenerateDirectory {
                            path: item.path,
                            directory: directive.directory.clone(),
                        });
                    }
                }
            }
        }

        problems
    }
}
