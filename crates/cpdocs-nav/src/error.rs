//! Navigation error types.
//!
//! Every variant is a build-time failure: the sidebar is assembled once
//! before the site framework runs, so there is no recovery path.

use std::path::PathBuf;

/// Error raised while loading, resolving or checking navigation.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// A navigation key has no label in any locale of the fallback chain.
    #[error("Missing label for navigation key `{key}` (looked up in: {})", .chain.join(" -> "))]
    MissingLabel {
        /// The unresolved key.
        key: String,
        /// Locales consulted, in lookup order.
        chain: Vec<String>,
    },
    /// A group has both or neither of explicit items and an autogenerate directive,
    /// or is otherwise structurally invalid.
    #[error("Malformed navigation group `{path}`: {reason}")]
    MalformedGroup {
        /// Label path of the group (`Parent > Child`).
        path: String,
        /// What is wrong with it.
        reason: String,
    },
    /// An entry has an invalid target or carries group-only fields.
    #[error("Malformed navigation entry `{path}`: {reason}")]
    MalformedEntry {
        /// Label path of the entry.
        path: String,
        /// What is wrong with it.
        reason: String,
    },
    /// An entry points at a page that does not exist.
    #[error("Broken link in `{path}`: `{target}` does not match any content page")]
    BrokenLink {
        /// Label path of the entry.
        path: String,
        /// The link or slug as written.
        target: String,
    },
    /// An autogenerated group points at a directory with no pages.
    #[error("Autogenerated group `{path}` has no pages under `{directory}`")]
    EmptyAutogenerateDirectory {
        /// Label path of the group.
        path: String,
        /// The directive's directory.
        directory: String,
    },
    /// A locale is not part of the configured locale set.
    #[error("Unknown locale `{0}`")]
    UnknownLocale(String),
    /// I/O error while reading navigation files.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// YAML parse error in a dictionary or sidebar definition.
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        source: serde_yaml::Error,
    },
}
