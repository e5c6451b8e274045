//! Per-file inputs and the provider seam that supplies them.
//!
//! Tag extraction, override annotation parsing and semantic-model building
//! all happen upstream. A [`SourceProvider`] hands the engine the finished
//! [`SourceFile`].

use crate::overrides::Override;
use crate::semantic::{Language, SemanticModel};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Everything the engine needs to validate one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File path.
    pub path: PathBuf,
    /// File content.
    pub content: String,
    /// Source language.
    pub language: Language,
    /// The `@arch` tag, if the file carries one.
    pub arch_tag: Option<String>,
    /// Declared intents.
    pub intents: Vec<String>,
    /// Inline override annotations.
    pub overrides: Vec<Override>,
    /// Semantic summary.
    pub model: SemanticModel,
}

impl SourceFile {
    /// Creates an untagged file with an empty model. Language comes from
    /// the extension.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            language: Language::from_path(&path),
            path,
            content: content.into(),
            arch_tag: None,
            intents: Vec::new(),
            overrides: Vec::new(),
            model: SemanticModel::default(),
        }
    }

    /// Sets the architecture tag.
    #[must_use]
    pub fn tagged(mut self, arch_id: impl Into<String>) -> Self {
        self.arch_tag = Some(arch_id.into());
        self
    }

    /// Adds an intent.
    #[must_use]
    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intents.push(intent.into());
        self
    }

    /// Adds an override annotation.
    #[must_use]
    pub fn with_override(mut self, ov: Override) -> Self {
        self.overrides.push(ov);
        self
    }

    /// Sets the semantic model.
    #[must_use]
    pub fn with_model(mut self, model: SemanticModel) -> Self {
        self.model = model;
        self
    }

    /// Overrides the detected language.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Number of lines in the content.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Content-addressed identity of the file's validation inputs.
    ///
    /// Covers path, tag, intents, overrides and content. Overrides are
    /// included so that editing an annotation invalidates cached results.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.path.to_string_lossy().as_bytes());
        hasher.update([0]);
        hasher.update(self.arch_tag.as_deref().unwrap_or_default().as_bytes());
        hasher.update([0]);
        for intent in &self.intents {
            hasher.update(intent.as_bytes());
            hasher.update([0]);
        }
        hasher.update(format!("{:?}", self.overrides).as_bytes());
        hasher.update([0]);
        hasher.update(format!("{:?}", self.model).as_bytes());
        hasher.update([0]);
        hasher.update(self.content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Errors obtaining a file's inputs.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// No semantic model is available for the file.
    #[error("no semantic model available for {path}")]
    MissingModel {
        /// The file.
        path: PathBuf,
    },

    /// Upstream data for the file could not be interpreted.
    #[error("malformed input for {path}: {message}")]
    Malformed {
        /// The file.
        path: PathBuf,
        /// What was wrong.
        message: String,
    },
}

/// Supplies per-file inputs to the engine.
///
/// Implementations are shared across worker threads.
pub trait SourceProvider: Send + Sync {
    /// Loads the inputs for one file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file or its model cannot be obtained. The
    /// engine turns this into a failed result for that file only.
    fn load(&self, path: &Path) -> Result<SourceFile, SourceError>;

    /// Releases any held resources (parsers, file handles).
    fn dispose(&self) {}
}

/// A provider backed by an in-memory map.
#[derive(Debug, Default)]
pub struct InMemorySource {
    files: RwLock<HashMap<PathBuf, SourceFile>>,
}

impl InMemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, builder-style.
    #[must_use]
    pub fn with_file(self, file: SourceFile) -> Self {
        self.insert(file);
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&self, file: SourceFile) {
        let mut files = match self.files.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        files.insert(file.path.clone(), file);
    }

    /// Number of files held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if no files are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<PathBuf, SourceFile>> {
        match self.files.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl SourceProvider for InMemorySource {
    fn load(&self, path: &Path) -> Result<SourceFile, SourceError> {
        self.read()
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_detects_language() {
        let file = SourceFile::new("src/app.service.ts", "export class A {}\n");
        assert_eq!(file.language, Language::TypeScript);
        assert_eq!(file.line_count(), 1);
        assert!(file.arch_tag.is_none());
    }

    #[test]
    fn content_hash_tracks_inputs() {
        let a = SourceFile::new("a.ts", "x").tagged("app");
        let b = SourceFile::new("a.ts", "x").tagged("app");
        let c = SourceFile::new("a.ts", "y").tagged("app");
        let d = SourceFile::new("a.ts", "x").tagged("app.other");
        let e = SourceFile::new("a.ts", "x")
            .tagged("app")
            .with_override(Override::new("forbid_import", "legacy"));
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
        assert_ne!(a.content_hash(), d.content_hash());
        assert_ne!(a.content_hash(), e.content_hash());
    }

    #[test]
    fn in_memory_source_loads_known_paths() {
        let source = InMemorySource::new().with_file(SourceFile::new("a.ts", "x"));
        assert!(source.load(Path::new("a.ts")).is_ok());
        assert!(matches!(
            source.load(Path::new("b.ts")),
            Err(SourceError::Io { .. })
        ));
        assert_eq!(source.len(), 1);
    }
}
