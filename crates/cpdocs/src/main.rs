//! cpdocs CLI - Classpad documentation site tooling.
//!
//! Provides commands for:
//! - `check`: Validate configuration, label dictionaries and the sidebar
//! - `sidebar`: Print the resolved sidebar as JSON
//! - `llms-txt`: Print the llms.txt plugin options or the page selection
//! - `export`: Print everything the site framework needs in one document

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, ExportArgs, LlmsTxtArgs, SidebarArgs};
use output::Output;

/// cpdocs - Classpad documentation site tooling.
#[derive(Parser)]
#[command(name = "cpdocs", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the site configuration, navigation labels and sidebar.
    Check(CheckArgs),
    /// Print the resolved sidebar tree.
    Sidebar(SidebarArgs),
    /// Print the llms.txt plugin options.
    LlmsTxt(LlmsTxtArgs),
    /// Print the full site configuration bundle.
    Export(ExportArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Check(args) => args.common.verbose,
            Self::Sidebar(args) => args.common.verbose,
            Self::LlmsTxt(args) => args.common.verbose,
            Self::Export(args) => args.common.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(),
        Commands::Sidebar(args) => args.execute(),
        Commands::LlmsTxt(args) => args.execute(),
        Commands::Export(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
