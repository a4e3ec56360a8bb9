//! Page selection and ordering for generated llms.txt files.
//!
//! Given the locale-qualified ids of all content pages, [`ExportPlan`]
//! computes which pages land in each output:
//!
//! - `llms-full.txt`: every page, promoted pages first
//! - `llms-small.txt`: the same order without excluded pages
//! - one file per custom set: pages matching any of the set's globs
//!
//! Globs follow the plugin's matcher: `*` stays within one path segment,
//! `**` crosses segments, and `dir/**` also matches the `dir` page itself
//! (an index page collapsed onto its directory). So `en/python/**` matches
//! `en/python`, `en/python/introduction.md` and `en/python/examples/hello`,
//! but not `en/reference/os/index.md`.

use glob::{MatchOptions, Pattern};
use serde::Serialize;

use crate::config::compile;
use crate::{LlmsError, LlmsTxtConfig};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One compiled glob.
#[derive(Clone, Debug)]
struct PageGlob {
    pattern: Pattern,
    /// For `dir/**`, the `dir` pattern.
    directory: Option<Pattern>,
}

impl PageGlob {
    fn new(glob: &str) -> Result<Self, LlmsError> {
        let directory = glob
            .strip_suffix("/**")
            .filter(|dir| !dir.is_empty())
            .map(compile)
            .transpose()?;
        Ok(Self {
            pattern: compile(glob)?,
            directory,
        })
    }

    fn matches(&self, page: &str) -> bool {
        self.pattern.matches_with(page, MATCH_OPTIONS)
            || self
                .directory
                .as_ref()
                .is_some_and(|dir| dir.matches_with(page, MATCH_OPTIONS))
    }
}

/// A compiled list of globs.
#[derive(Clone, Debug, Default)]
pub struct PathMatcher {
    globs: Vec<PageGlob>,
}

impl PathMatcher {
    /// Compile every glob.
    ///
    /// # Errors
    ///
    /// Returns [`LlmsError::Pattern`] for the first glob that does not compile.
    pub fn new<S: AsRef<str>>(globs: &[S]) -> Result<Self, LlmsError> {
        let globs = globs
            .iter()
            .map(|g| PageGlob::new(g.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(Self { globs })
    }

    /// Check whether any glob matches `page`.
    #[must_use]
    pub fn matches(&self, page: &str) -> bool {
        self.first_match(page).is_some()
    }

    /// Index of the first glob matching `page`.
    #[must_use]
    pub fn first_match(&self, page: &str) -> Option<usize> {
        self.globs.iter().position(|g| g.matches(page))
    }
}

/// Pages of one custom set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SetPlan {
    pub label: String,
    /// Output file relative to the site root.
    pub file: String,
    pub pages: Vec<String>,
}

/// Pages selected for each generated file, in output order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportPlan {
    /// Pages of `llms-full.txt`.
    pub full: Vec<String>,
    /// Pages of `llms-small.txt`.
    pub small: Vec<String>,
    /// Pages of each custom set, in declaration order.
    pub sets: Vec<SetPlan>,
}

impl ExportPlan {
    /// Compute the plan for `pages`, given in their natural order.
    ///
    /// Pages matching a `promote` glob move to the front, ordered by the
    /// first glob they match; all other pages keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns [`LlmsError::Pattern`] if any glob does not compile.
    pub fn build<I, S>(config: &LlmsTxtConfig, pages: I) -> Result<Self, LlmsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let promote = PathMatcher::new(&config.promote)?;
        let exclude = PathMatcher::new(&config.exclude)?;

        let mut full: Vec<String> = pages.into_iter().map(Into::into).collect();
        // Stable: unpromoted pages share the last rank and keep their order.
        full.sort_by_key(|page| promote.first_match(page).unwrap_or(usize::MAX));

        let small = full
            .iter()
            .filter(|page| !exclude.matches(page))
            .cloned()
            .collect();

        let sets = config
            .custom_sets
            .iter()
            .map(|set| -> Result<SetPlan, LlmsError> {
                let matcher = PathMatcher::new(&set.paths)?;
                let pages: Vec<String> = full
                    .iter()
                    .filter(|page| matcher.matches(page))
                    .cloned()
                    .collect();
                if pages.is_empty() {
                    tracing::warn!(set = %set.label, "Custom set matches no pages");
                }
                Ok(SetPlan {
                    label: set.label.clone(),
                    file: set.output_file(),
                    pages,
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { full, small, sets })
    }
}
