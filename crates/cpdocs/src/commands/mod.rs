//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod export;
pub(crate) mod llms_txt;
pub(crate) mod sidebar;

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use cpdocs_config::{CliSettings, Config};
use cpdocs_llms::LlmsTxtConfig;
use cpdocs_nav::{ContentIndex, LabelResolver, Locales, SidebarDefinition, SidebarTree};

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use export::ExportArgs;
pub(crate) use llms_txt::LlmsTxtArgs;
pub(crate) use sidebar::SidebarArgs;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover cpdocs.toml).
    #[arg(short, long, env = "CPDOCS_CONFIG")]
    config: Option<PathBuf>,

    /// Docs content directory (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Default locale (overrides config).
    #[arg(long)]
    default_locale: Option<String>,

    /// Site base path, e.g. `/wiki` (overrides config).
    #[arg(long)]
    base: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Configuration plus the label dictionaries it points at.
pub(crate) struct Site {
    pub config: Config,
    pub locales: Locales,
}

impl Site {
    /// Load configuration and navigation labels.
    pub(crate) fn load(args: &CommonArgs) -> Result<Self, CliError> {
        let cli_settings = CliSettings {
            content_dir: args.content_dir.clone(),
            default_locale: args.default_locale.clone(),
            base: args.base.clone(),
        };
        let config = Config::load(args.config.as_deref(), Some(&cli_settings))?;
        let locales = Locales::load_dir(
            &config.docs_resolved.nav_dir,
            &config.i18n.default_locale,
            &config.i18n.locales,
            &config.i18n.fallback,
        )?;
        Ok(Self { config, locales })
    }

    /// Resolve the sidebar with `locale` as the active locale.
    ///
    /// The default locale is used when `locale` is `None`.
    pub(crate) fn sidebar(&self, locale: Option<&str>) -> Result<SidebarTree, CliError> {
        let mut resolver = LabelResolver::new(&self.locales);
        if let Some(locale) = locale {
            resolver = resolver.with_active_locale(locale)?;
        }
        let definition = SidebarDefinition::load(&self.config.docs_resolved.sidebar_path)?;
        let tree = definition.resolve(&resolver)?;
        tracing::info!(
            locale = resolver.active_locale(),
            groups = tree.group_count(),
            entries = tree.entry_count(),
            "Resolved sidebar"
        );
        Ok(tree)
    }

    /// Load and validate the llms.txt plugin options.
    ///
    /// Returns `None` when the plugin is disabled.
    pub(crate) fn llms_txt(&self) -> Result<Option<LlmsTxtConfig>, CliError> {
        let settings = &self.config.llms_txt_resolved;
        if !settings.enabled {
            tracing::info!("llms.txt export disabled");
            return Ok(None);
        }
        let llms = LlmsTxtConfig::load(&settings.config_path)?;
        llms.validate(&self.config.i18n.locales)?;
        Ok(Some(llms))
    }

    /// Index the content directory.
    ///
    /// Returns `None` when the directory doesn't exist.
    pub(crate) fn content(&self) -> Option<ContentIndex> {
        let dir = &self.config.docs_resolved.content_dir;
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "Content directory not found");
            return None;
        }
        Some(ContentIndex::scan(dir))
    }

    /// Locale-neutral page ids of the default locale, as sidebar links see them.
    pub(crate) fn sidebar_pages(&self, index: &ContentIndex) -> ContentIndex {
        if self.config.docs_resolved.locale_prefixed {
            index.for_locale(&self.config.i18n.default_locale)
        } else {
            index.clone()
        }
    }
}

/// Write JSON to `path`, or to stdout when no path is given.
pub(crate) fn write_json(json: &str, path: Option<&Path>) -> Result<(), CliError> {
    if let Some(path) = path {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, format!("{json}\n"))?;
    } else {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}")?;
    }
    Ok(())
}
