//! Sidebar navigation for the cpdocs documentation site.
//!
//! This crate provides:
//! - [`Locales`]: per-locale label dictionaries with fallback chains
//! - [`LabelResolver`]: builds [`NavigationGroup`]s whose labels come from
//!   [`NavigationKey`]s instead of inline text
//! - [`SidebarDefinition`]: the `sidebar.yaml` format
//! - [`SidebarBuilder`] / [`SidebarTree`]: ordered, validated assembly of the
//!   tree handed to the site framework
//! - [`ContentIndex`]: content page discovery for link checking
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::collections::BTreeMap;
//! use std::path::Path;
//! use cpdocs_nav::{ContentIndex, LabelResolver, Locales, SidebarDefinition};
//!
//! let locales = Locales::load_dir(Path::new("nav"), "en", &["en".to_owned()], &BTreeMap::new())?;
//! let resolver = LabelResolver::new(&locales);
//! let tree = SidebarDefinition::load(Path::new("sidebar.yaml"))?.resolve(&resolver)?;
//!
//! let index = ContentIndex::scan(Path::new("src/content/docs")).for_locale("en");
//! for problem in tree.check_content(&index, "/") {
//!     eprintln!("{problem}");
//! }
//! # Ok(())
//! # }
//! ```

mod content;
mod definition;
mod error;
mod locale;
mod model;
mod resolver;
mod sidebar;

pub use content::{ContentIndex, link_to_page_id};
pub use definition::{ItemDefinition, SidebarDefinition};
pub use error::NavError;
pub use locale::{LocaleDictionary, Locales, NavigationKey};
pub use model::{
    AutogenDirective, Badge, BadgeVariant, GroupContents, LinkTarget, NavigationEntry,
    NavigationGroup, PartialGroup, SidebarItem,
};
pub use resolver::{LabelResolver, ResolvedLabel, build_group};
pub use sidebar::{NodeRef, SidebarBuilder, SidebarTree, WalkItem};
