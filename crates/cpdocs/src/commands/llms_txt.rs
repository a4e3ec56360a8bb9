//! `cpdocs llms-txt` command implementation.

use std::path::PathBuf;

use clap::Args;
use cpdocs_llms::ExportPlan;

use super::{CommonArgs, Site, write_json};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the llms-txt command.
#[derive(Args)]
pub(crate) struct LlmsTxtArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Print the pages selected for each generated file instead of the options.
    #[arg(long)]
    plan: bool,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl LlmsTxtArgs {
    /// Execute the llms-txt command.
    ///
    /// # Errors
    ///
    /// Returns an error if the plugin is disabled, its options are invalid,
    /// or `--plan` is used without a content directory.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let site = Site::load(&self.common)?;

        let Some(llms) = site.llms_txt()? else {
            return Err(CliError::Validation(
                "llms.txt export is disabled in the configuration".to_owned(),
            ));
        };

        let json = if self.plan {
            let index = site.content().ok_or_else(|| {
                CliError::Validation(format!(
                    "content directory {} not found",
                    site.config.docs_resolved.content_dir.display()
                ))
            })?;
            let plan = ExportPlan::build(&llms, index.pages())?;
            for set in &plan.sets {
                if set.pages.is_empty() {
                    output.warning(&format!("Custom set '{}' matches no pages", set.label));
                }
            }
            serde_json::to_string_pretty(&plan)?
        } else {
            serde_json::to_string_pretty(&llms)?
        };

        write_json(&json, self.output.as_deref())?;

        if let Some(path) = &self.output {
            output.success(&format!("llms.txt options written to {}", path.display()));
        }
        Ok(())
    }
}
