//! # archtag-core
//!
//! Core model for architecture constraints.
//!
//! This crate provides the foundational types for declaring and resolving
//! architectures and for validating files against them. It includes:
//!
//! - [`Registry`] snapshots loaded from YAML via [`registry`]
//! - [`Resolver`] for flattening inheritance and mixins
//! - [`ConstraintValidator`] trait for per-rule validators
//! - [`reconcile`] for override and intent-exemption matching
//! - [`Violation`] and [`ValidationResult`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use archtag_core::{registry, Resolver};
//!
//! let registry = registry::load_registry_from_file("archtag.yaml".as_ref())?;
//! let resolver = Resolver::new();
//! let resolved = resolver.resolve(&registry, "app.service")?;
//! for c in &resolved.constraints {
//!     println!("{} (from {})", c.key, c.source);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod overrides;
mod patterns;
mod resolver;
mod rule;
mod semantic;
mod source;
mod types;

/// Architecture registries and their YAML loader.
pub mod registry;

/// Utility modules for validator implementations.
pub mod utils;

pub use config::{
    default_concurrency, Config, ConfigError, FilesConfig, MissingWhyPolicy, OverridesConfig,
    UntaggedConfig, UntaggedPolicy, ValidationConfig, MAX_CONCURRENCY,
};
pub use context::ValidationContext;
pub use overrides::{reconcile, Override, OverrideField, OverridePolicy, Reconciliation};
pub use patterns::{CanonicalPattern, PatternRegistry};
pub use registry::{
    ArchitectureNode, Constraint, ConstraintValue, Fingerprint, LoadError, MatchMode, Mixin,
    Registry, RuleKind, ValueShape, INTENT_PREFIX,
};
pub use resolver::{ruleset_id, ResolveError, ResolvedArchitecture, ResolvedConstraint, Resolver};
pub use rule::{ConstraintValidator, ValidationOutcome, ValidatorBox};
pub use semantic::{CallSite, ClassInfo, Export, FunctionInfo, Import, Language, SemanticModel};
pub use source::{InMemorySource, SourceError, SourceFile, SourceProvider};
pub use types::{
    synthetic, BatchReport, DidYouMean, FileStatus, Location, OverrideDebt, Severity, Suggestion,
    SuggestionAction, ValidationResult, Violation,
};
