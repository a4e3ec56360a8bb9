//! llms.txt docs-export plugin configuration for cpdocs.
//!
//! The plugin itself runs inside the site framework. This crate owns its
//! options ([`LlmsTxtConfig`]) and reproduces how they select and order
//! pages ([`ExportPlan`]), so the selection can be checked before a build.

mod config;
mod error;
mod plan;

pub use config::{CustomSet, LlmsTxtConfig, OptionalLink};
pub use error::LlmsError;
pub use plan::{ExportPlan, PathMatcher, SetPlan};
