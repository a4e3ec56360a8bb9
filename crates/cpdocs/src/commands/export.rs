//! `cpdocs export` command implementation.
//!
//! Writes a single JSON document with everything the site framework reads at
//! build start. Field names follow the framework's configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use cpdocs_llms::LlmsTxtConfig;
use cpdocs_nav::SidebarTree;
use serde::Serialize;

use super::{CommonArgs, Site, write_json};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EditLink<'a> {
    base_url: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteBundle<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    site: Option<&'a str>,
    base: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logo: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    favicon: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    edit_link: Option<EditLink<'a>>,
    social: &'a BTreeMap<String, String>,
    last_updated: bool,
    default_locale: &'a str,
    locales: &'a [String],
    fallback: &'a BTreeMap<String, Vec<String>>,
    sidebar: &'a SidebarTree,
    #[serde(skip_serializing_if = "Option::is_none")]
    llms_txt: Option<&'a LlmsTxtConfig>,
}

impl<'a> SiteBundle<'a> {
    fn new(site: &'a Site, sidebar: &'a SidebarTree, llms_txt: Option<&'a LlmsTxtConfig>) -> Self {
        let meta = &site.config.site;
        let i18n = &site.config.i18n;
        Self {
            site: meta.url.as_deref(),
            base: &meta.base,
            title: &meta.title,
            description: meta.description.as_deref(),
            logo: meta.logo.as_deref(),
            favicon: meta.favicon.as_deref(),
            edit_link: meta
                .edit_link_base
                .as_deref()
                .map(|base_url| EditLink { base_url }),
            social: &meta.social,
            last_updated: meta.last_updated,
            default_locale: &i18n.default_locale,
            locales: &i18n.locales,
            fallback: &i18n.fallback,
            sidebar,
            llms_txt,
        }
    }
}

impl ExportArgs {
    /// Execute the export command.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of the configuration fails to load.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let site = Site::load(&self.common)?;

        let sidebar = site.sidebar(None)?;
        let llms_txt = site.llms_txt()?;
        let bundle = SiteBundle::new(&site, &sidebar, llms_txt.as_ref());

        write_json(&serde_json::to_string_pretty(&bundle)?, self.output.as_deref())?;

        if let Some(path) = &self.output {
            output.success(&format!("Site configuration written to {}", path.display()));
        }
        Ok(())
    }
}
