//! Check command implementation.

use anyhow::{Context, Result};
use archtag::registry::load_registry_from_file;
use archtag::{Config, EngineError, PatternRegistry, ValidationEngine};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::diagnostic;
use crate::config_resolver::ConfigSource;
use crate::manifest::ManifestSource;
use crate::OutputFormat;

/// Inputs of the check command.
pub struct CheckArgs<'a> {
    /// Files to validate; empty means every manifest entry.
    pub paths: &'a [PathBuf],
    /// Registry YAML.
    pub registry: &'a Path,
    /// Semantic-model manifest.
    pub models: &'a Path,
    /// Optional canonical pattern YAML.
    pub patterns: Option<&'a Path>,
    /// Output format.
    pub format: OutputFormat,
    /// Where the config comes from.
    pub config: &'a ConfigSource,
}

/// Runs the check command. Returns true if any file failed.
pub fn run(args: &CheckArgs<'_>) -> Result<bool> {
    let config = load_config(args.config)?;
    let registry = load_registry_from_file(args.registry).map_err(diagnostic)?;
    let source = ManifestSource::from_file(args.models)?;

    let paths = if args.paths.is_empty() {
        source.paths()
    } else {
        args.paths.to_vec()
    };

    let mut builder = ValidationEngine::builder()
        .config(config)
        .registry(registry)
        .source(Arc::new(source));
    if let Some(path) = args.patterns {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read patterns: {}", path.display()))?;
        let patterns = PatternRegistry::from_yaml(&content)
            .with_context(|| format!("Failed to parse patterns: {}", path.display()))?;
        builder = builder.patterns(patterns);
    }
    let engine = builder.build().context("Failed to build validation engine")?;

    tracing::info!(
        "Checking {} file(s) against {} architecture(s)",
        paths.len(),
        engine.registry().len()
    );

    let report = match engine.validate_report(&paths) {
        Ok(report) => report,
        Err(EngineError::Resolve(e)) => return Err(diagnostic(e)),
        Err(e) => return Err(e).context("Validation failed"),
    };
    engine.dispose();

    super::output::print_report(&report, args.format)?;
    Ok(report.has_failures())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => Ok(Config::default()),
        other => {
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}
