//! archtag CLI tool.
//!
//! Usage:
//! ```bash
//! archtag check [OPTIONS] --models <JSON> [PATHS]...
//! archtag resolve <ARCH_ID>
//! archtag list-rules
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;
mod manifest;

/// Architecture constraint checker for @arch-tagged source files
#[derive(Parser)]
#[command(name = "archtag")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate files against their architectures
    Check {
        /// Files to validate (default: every file in the manifest)
        paths: Vec<PathBuf>,

        /// Architecture registry (YAML)
        #[arg(short, long, default_value = "archtag.yaml")]
        registry: PathBuf,

        /// Semantic-model manifest (JSON)
        #[arg(short, long)]
        models: PathBuf,

        /// Canonical pattern registry (YAML) for did-you-mean hints
        #[arg(long)]
        patterns: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the flattened rule set of an architecture
    Resolve {
        /// Architecture id
        arch_id: String,

        /// Architecture registry (YAML)
        #[arg(short, long, default_value = "archtag.yaml")]
        registry: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List available rules
    ListRules,
}

/// Output format for results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-finding compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            paths,
            registry,
            models,
            patterns,
            format,
        } => {
            let project_dir = registry
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let source = config_resolver::resolve(project_dir, cli.config.as_deref());
            let failed = commands::check::run(&commands::check::CheckArgs {
                paths: &paths,
                registry: &registry,
                models: &models,
                patterns: patterns.as_deref(),
                format,
                config: &source,
            })?;
            if failed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Resolve {
            arch_id,
            registry,
            format,
        } => commands::resolve::run(&arch_id, &registry, format),
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
    }
}
