//! Resolve command implementation.

use anyhow::Result;
use archtag::registry::load_registry_from_file;
use archtag::Resolver;
use std::path::Path;

use super::diagnostic;
use crate::OutputFormat;

/// Runs the resolve command.
pub fn run(arch_id: &str, registry: &Path, format: OutputFormat) -> Result<()> {
    let registry = load_registry_from_file(registry).map_err(diagnostic)?;
    let resolved = Resolver::new()
        .resolve(&registry, arch_id)
        .map_err(diagnostic)?;
    super::output::print_resolved(&resolved, format)
}
