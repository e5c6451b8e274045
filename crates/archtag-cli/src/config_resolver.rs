//! Configuration file discovery.
//!
//! Lookup order, first hit wins:
//!
//! 1. `--config <path>`
//! 2. `archtag.toml`, then `.archtag.toml`, next to the registry
//! 3. `$ARCHTAG_CONFIG_DIR/config.toml`, else `~/.archtag/config.toml`
//! 4. built-in defaults

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the config path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` for the global fallback.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["archtag.toml", ".archtag.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Env var naming the global config directory.
pub const CONFIG_DIR_ENV: &str = "ARCHTAG_CONFIG_DIR";

/// Finds the configuration for a project directory.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    discover(project_dir, explicit, global_config_dir().as_deref())
}

fn discover(project_dir: &Path, explicit: Option<&Path>, global_dir: Option<&Path>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_CONFIG_NAME)) {
        Some(candidate) if candidate.is_file() => {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::Default,
    }
}

/// Returns the global config directory.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".archtag"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "[validation]\n").unwrap();
        path
    }

    #[test]
    fn explicit_wins_without_existence_check() {
        let project = TempDir::new().unwrap();
        touch(project.path(), "archtag.toml");
        let explicit = Path::new("/nowhere/custom.toml");

        assert_eq!(
            discover(project.path(), Some(explicit), None),
            ConfigSource::Explicit(explicit.to_path_buf())
        );
    }

    #[test]
    fn plain_name_preferred_over_dotfile() {
        let project = TempDir::new().unwrap();
        let plain = touch(project.path(), "archtag.toml");
        touch(project.path(), ".archtag.toml");

        assert_eq!(
            discover(project.path(), None, None),
            ConfigSource::Project(plain)
        );
    }

    #[test]
    fn dotfile_found() {
        let project = TempDir::new().unwrap();
        let dot = touch(project.path(), ".archtag.toml");
        assert_eq!(discover(project.path(), None, None), ConfigSource::Project(dot));
    }

    #[test]
    fn project_shadows_global() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        touch(project.path(), "archtag.toml");
        touch(global.path(), "config.toml");

        let found = discover(project.path(), None, Some(global.path()));
        assert!(matches!(found, ConfigSource::Project(_)));
        assert!(!found.is_global());
    }

    #[test]
    fn global_fallback() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let config = touch(global.path(), "config.toml");

        let found = discover(project.path(), None, Some(global.path()));
        assert_eq!(found, ConfigSource::Global(config));
        assert!(found.is_global());
    }

    #[test]
    fn defaults_when_nothing_found() {
        let project = TempDir::new().unwrap();
        let empty_global = TempDir::new().unwrap();

        let found = discover(project.path(), None, Some(empty_global.path()));
        assert_eq!(found, ConfigSource::Default);
        assert!(found.path().is_none());
    }

    #[test]
    fn directory_named_like_config_is_ignored() {
        let project = TempDir::new().unwrap();
        fs::create_dir(project.path().join("archtag.toml")).unwrap();
        assert_eq!(discover(project.path(), None, None), ConfigSource::Default);
    }
}
