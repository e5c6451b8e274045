//! Architecture registries driven by YAML declarations.
//!
//! # Architecture
//!
//! ```text
//! YAML text
//!   ↓ serde (DTO layer)
//! dto types
//!   ↓ validate + convert
//! Registry (immutable snapshot, fingerprinted)
//!   ↓ Resolver::resolve()
//! ResolvedArchitecture
//! ```

use std::path::Path;

pub mod dto;
pub mod loader;
pub mod model;

pub use loader::LoadError;
pub use model::{
    ArchitectureNode, Constraint, ConstraintValue, Fingerprint, MatchMode, Mixin, Registry,
    RuleKind, ValueShape, INTENT_PREFIX,
};

/// Parses YAML content into a registry snapshot.
///
/// # Errors
///
/// Returns an error if YAML parsing or catalog validation fails.
pub fn load_registry_from_yaml(content: &str) -> Result<Registry, RegistryFileError> {
    let dto: dto::RegistryDto = serde_yaml::from_str(content).map_err(LoadError::from)?;
    Ok(loader::load(dto)?)
}

/// Reads and parses a registry file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its content is invalid.
pub fn load_registry_from_file(path: &Path) -> Result<Registry, RegistryFileError> {
    let content = std::fs::read_to_string(path).map_err(|e| RegistryFileError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_registry_from_yaml(&content)
}

/// Errors from reading and loading a registry.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum RegistryFileError {
    /// The file could not be read.
    #[error("failed to read registry {path}: {source}")]
    #[diagnostic(code(archtag::registry::io))]
    Io {
        /// Path that failed to read.
        path: std::path::PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The content failed to load.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_errors_surface_as_load_errors() {
        let err = load_registry_from_yaml("architectures: [not, a, map]").unwrap_err();
        assert!(matches!(err, RegistryFileError::Load(LoadError::Yaml(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_registry_from_file(Path::new("/nonexistent/registry.yaml")).unwrap_err();
        assert!(matches!(err, RegistryFileError::Io { .. }));
    }
}
