//! `cpdocs sidebar` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::{CommonArgs, Site, write_json};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sidebar command.
#[derive(Args)]
pub(crate) struct SidebarArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Locale whose labels are used (default: the configured default locale).
    #[arg(short, long)]
    locale: Option<String>,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl SidebarArgs {
    /// Execute the sidebar command.
    ///
    /// # Errors
    ///
    /// Returns an error if the sidebar cannot be resolved or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let site = Site::load(&self.common)?;

        let tree = site.sidebar(self.locale.as_deref())?;
        write_json(&tree.to_json()?, self.output.as_deref())?;

        if let Some(path) = &self.output {
            output.success(&format!("Sidebar written to {}", path.display()));
        }
        Ok(())
    }
}
