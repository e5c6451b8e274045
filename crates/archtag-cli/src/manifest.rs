//! Manifest-backed source provider.
//!
//! The manifest is a JSON document produced by an external parser. It maps
//! each file path (relative to the manifest's directory) to the file's tag,
//! intents, override annotations and semantic model:
//!
//! ```json
//! {
//!   "files": {
//!     "src/users/user.service.ts": {
//!       "arch": "app.service",
//!       "intents": ["sandboxed"],
//!       "overrides": [{ "rule": "forbid_import:axios", "reason": "legacy" }],
//!       "model": { "imports": [{ "module": "axios", "line": 1 }] }
//!     }
//!   }
//! }
//! ```
//!
//! File content is read from disk on each load.

use anyhow::{Context, Result};
use archtag::{Language, Override, SemanticModel, SourceError, SourceFile, SourceProvider};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct ManifestDto {
    #[serde(default)]
    files: BTreeMap<PathBuf, ManifestEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestEntry {
    #[serde(default)]
    arch: Option<String>,
    #[serde(default)]
    intents: Vec<String>,
    #[serde(default)]
    overrides: Vec<Override>,
    #[serde(default)]
    model: SemanticModel,
    #[serde(default)]
    language: Option<Language>,
}

/// Loads file inputs from a semantic-model manifest plus the file system.
#[derive(Debug)]
pub struct ManifestSource {
    base: PathBuf,
    entries: BTreeMap<PathBuf, ManifestEntry>,
}

impl ManifestSource {
    /// Reads a manifest file. Paths inside it resolve against its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::parse(&content, base)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))
    }

    fn parse(content: &str, base: PathBuf) -> Result<Self> {
        let dto: ManifestDto = serde_json::from_str(content)?;
        Ok(Self {
            base,
            entries: dto.files,
        })
    }

    /// Every file listed in the manifest, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.keys().cloned().collect()
    }
}

impl SourceProvider for ManifestSource {
    fn load(&self, path: &Path) -> Result<SourceFile, SourceError> {
        let entry = self
            .entries
            .get(path)
            .ok_or_else(|| SourceError::MissingModel {
                path: path.to_path_buf(),
            })?;

        let on_disk = self.base.join(path);
        let content = std::fs::read_to_string(&on_disk).map_err(|e| SourceError::Io {
            path: on_disk.clone(),
            source: e,
        })?;

        let mut file = SourceFile::new(path, content).with_model(entry.model.clone());
        file.arch_tag.clone_from(&entry.arch);
        file.intents.clone_from(&entry.intents);
        file.overrides.clone_from(&entry.overrides);
        if let Some(language) = entry.language {
            file = file.with_language(language);
        }
        Ok(file)
    }
}
