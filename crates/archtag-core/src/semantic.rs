//! Per-file semantic model supplied by an external parser.
//!
//! The core never parses source code. It consumes this read-only summary of
//! imports, exports, classes, functions and call sites.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source language of a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// TypeScript (`.ts`, `.tsx`, `.mts`, `.cts`).
    TypeScript,
    /// JavaScript (`.js`, `.jsx`, `.mjs`, `.cjs`).
    JavaScript,
    /// Python (`.py`).
    Python,
    /// Go (`.go`).
    Go,
    /// Java (`.java`).
    Java,
    /// Anything else.
    #[default]
    Other,
}

impl Language {
    /// Detects the language from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts" | "tsx" | "mts" | "cts") => Self::TypeScript,
            Some("js" | "jsx" | "mjs" | "cjs") => Self::JavaScript,
            Some("py") => Self::Python,
            Some("go") => Self::Go,
            Some("java") => Self::Java,
            _ => Self::Other,
        }
    }

    /// Whether the language has class decorators (or annotations).
    #[must_use]
    pub fn has_decorators(self) -> bool {
        !matches!(self, Self::Go)
    }
}

/// An import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// Module specifier (`axios`, `./utils`, `github.com/x/y`).
    pub module: String,
    /// Named bindings.
    #[serde(default)]
    pub named: Vec<String>,
    /// Default binding.
    #[serde(default)]
    pub default: Option<String>,
    /// Line (1-indexed).
    #[serde(default)]
    pub line: usize,
}

impl Import {
    /// Creates an import with no bindings.
    #[must_use]
    pub fn new(module: impl Into<String>, line: usize) -> Self {
        Self {
            module: module.into(),
            named: Vec::new(),
            default: None,
            line,
        }
    }

    /// Adds named bindings.
    #[must_use]
    pub fn with_named<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.named.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets the default binding.
    #[must_use]
    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default = Some(name.into());
        self
    }

    /// Whether this import provides `name` by specifier or binding.
    #[must_use]
    pub fn provides(&self, name: &str) -> bool {
        self.module == name
            || self.named.iter().any(|n| n == name)
            || self.default.as_deref() == Some(name)
    }
}

/// An exported binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Export {
    /// Bound name.
    pub name: String,
    /// Whether this is the default export.
    #[serde(default)]
    pub is_default: bool,
    /// Line (1-indexed).
    #[serde(default)]
    pub line: usize,
}

/// A declared class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Class name.
    pub name: String,
    /// Whether the class is exported.
    #[serde(default)]
    pub exported: bool,
    /// Decorator names, without the leading `@`.
    #[serde(default)]
    pub decorators: Vec<String>,
    /// Public method names.
    #[serde(default)]
    pub public_methods: Vec<String>,
    /// Line (1-indexed).
    #[serde(default)]
    pub line: usize,
}

impl ClassInfo {
    /// Whether the class carries the decorator (with or without `@`).
    #[must_use]
    pub fn has_decorator(&self, name: &str) -> bool {
        let wanted = name.trim_start_matches('@');
        self.decorators
            .iter()
            .any(|d| d.trim_start_matches('@') == wanted)
    }
}

/// A declared function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    /// Function name.
    pub name: String,
    /// Whether the function is exported.
    #[serde(default)]
    pub exported: bool,
    /// Line (1-indexed).
    #[serde(default)]
    pub line: usize,
}

/// A call expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    /// Dotted callee (`console.log`, `fs.readFileSync`, `eval`).
    pub callee: String,
    /// Line (1-indexed).
    #[serde(default)]
    pub line: usize,
}

/// Semantic summary of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticModel {
    /// Imports, in source order.
    #[serde(default)]
    pub imports: Vec<Import>,
    /// Exports, in source order.
    #[serde(default)]
    pub exports: Vec<Export>,
    /// Classes.
    #[serde(default)]
    pub classes: Vec<ClassInfo>,
    /// Functions.
    #[serde(default)]
    pub functions: Vec<FunctionInfo>,
    /// Call sites.
    #[serde(default)]
    pub calls: Vec<CallSite>,
}

impl SemanticModel {
    /// Exported classes.
    pub fn exported_classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.iter().filter(|c| c.exported)
    }

    /// The default export, if any.
    #[must_use]
    pub fn default_export(&self) -> Option<&Export> {
        self.exports.iter().find(|e| e.is_default)
    }

    /// Whether any class carries the decorator.
    #[must_use]
    pub fn any_class_has_decorator(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c.has_decorator(name))
    }
}
