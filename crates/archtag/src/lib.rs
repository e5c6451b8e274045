//! # archtag
//!
//! Architecture constraint checking for tagged source files.
//!
//! This is the main facade crate that re-exports the core model and the
//! built-in validators, and provides the concurrent [`ValidationEngine`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use archtag::{registry, Config, InMemorySource, SourceFile, ValidationEngine};
//! use std::sync::Arc;
//!
//! let registry = registry::load_registry_from_file("archtag.yaml".as_ref())?;
//! let source = InMemorySource::new()
//!     .with_file(SourceFile::new("src/api.ts", content).tagged("app.service"));
//!
//! let engine = ValidationEngine::builder()
//!     .config(Config::new())
//!     .registry(registry)
//!     .source(Arc::new(source))
//!     .build()?;
//!
//! let report = engine.validate_report(&["src/api.ts".into()])?;
//! println!("{}", report.summary());
//! ```
//!
//! ## Overrides
//!
//! A file can suppress one finding with an override that names the
//! constraint key (or the bare rule) and gives a reason:
//!
//! ```text
//! @override forbid_import:axios reason="legacy client" expires=2026-12-31
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use archtag_core::*;

/// Built-in constraint validators.
pub mod rules {
    pub use archtag_rules::*;
}

mod engine;

pub use engine::{EngineBuilder, EngineError, ValidationEngine};
