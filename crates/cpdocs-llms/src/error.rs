//! Docs-export error types.

use std::path::PathBuf;

/// Error raised while loading or applying llms.txt options.
#[derive(Debug, thiserror::Error)]
pub enum LlmsError {
    /// I/O error reading the options file.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// TOML parse error.
    #[error("Failed to parse llms.txt options{}: {source}", .path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    Parse {
        path: Option<PathBuf>,
        source: toml::de::Error,
    },
    /// Invalid option value.
    #[error("llms.txt options error: {0}")]
    Validation(String),
    /// A path glob that does not compile.
    #[error("Invalid glob `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
}
