//! `cpdocs check` command implementation.

use clap::Args;

use super::{CommonArgs, Site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Skip checking sidebar links against the content directory.
    #[arg(long)]
    no_content: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if any locale fails to resolve, the llms.txt options
    /// are invalid, or the sidebar points at missing content.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let site = Site::load(&self.common)?;

        output.heading(&site.config.site.title);
        if let Some(path) = &site.config.config_path {
            output.field("Config", &path.display().to_string());
        }

        // Every locale must resolve; a missing key fails even through fallbacks.
        let tree = site.sidebar(None)?;
        for locale in site.config.i18n.secondary_locales() {
            site.sidebar(Some(locale))?;
        }
        if tree.is_empty() {
            output.warning("Sidebar defines no tabs");
        }
        output.field(
            "Sidebar",
            &format!(
                "{} tabs, {} groups, {} entries",
                tree.groups().len(),
                tree.group_count(),
                tree.entry_count()
            ),
        );
        output.field(
            "Locales",
            &format!(
                "{} (default {})",
                site.config.i18n.locales.join(", "),
                site.config.i18n.default_locale
            ),
        );

        match site.llms_txt()? {
            Some(llms) => output.field("llms.txt", &format!("{} files", llms.output_files().len())),
            None => output.field("llms.txt", "disabled"),
        }

        if self.no_content {
            output.info("Content checks skipped (--no-content)");
            output.success("Configuration OK");
            return Ok(());
        }

        let Some(index) = site.content() else {
            output.warning(&format!(
                "Content directory {} not found, skipping link checks",
                site.config.docs_resolved.content_dir.display()
            ));
            output.success("Configuration OK");
            return Ok(());
        };

        let pages = site.sidebar_pages(&index);
        let problems = tree.check_content(&pages, &site.config.site.base);
        if !problems.is_empty() {
            for problem in &problems {
                output.problem(&problem.to_string());
            }
            return Err(CliError::Validation(format!(
                "{} sidebar problem(s) found",
                problems.len()
            )));
        }

        output.success(&format!("Configuration OK ({} pages)", pages.len()));
        Ok(())
    }
}
