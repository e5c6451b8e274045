//! Fixtures shared by validator tests.

use archtag_core::{Constraint, ResolvedConstraint, SemanticModel, SourceFile};

/// Wraps a constraint as if resolved from architecture `test`.
pub(crate) fn resolved(constraint: Constraint) -> ResolvedConstraint {
    ResolvedConstraint {
        key: constraint.key(),
        constraint,
        source: "test".to_string(),
    }
}

/// An empty file at `path`.
pub(crate) fn file(path: &str) -> SourceFile {
    SourceFile::new(path, "")
}

/// A file at `path` with the given model.
pub(crate) fn file_with(path: &str, model: SemanticModel) -> SourceFile {
    SourceFile::new(path, "").with_model(model)
}
