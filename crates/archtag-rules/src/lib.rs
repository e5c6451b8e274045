//! # archtag-rules
//!
//! Built-in constraint validators for archtag.
//!
//! Every rule kind in the catalog has exactly one validator here, selected
//! through [`ValidatorRegistry`].
//!
//! ## Available Validators
//!
//! | Rule | Value | Description |
//! |------|-------|-------------|
//! | `forbid_import` | module(s) | Forbids importing the listed modules |
//! | `require_import` | module(s) | Requires importing the listed modules (`match: all\|any`) |
//! | `require_export` | name(s) | Requires exports (exact, `*suffix`, `prefix*`, `default`, regex) |
//! | `require_decorator` | decorator(s) | Requires a decorator on every exported class |
//! | `naming_pattern` | regex | Requires the file name to match |
//! | `max_file_lines` | number | Limits lines per file |
//! | `forbid_pattern` | regex(es) | Forbids matching content |
//! | `forbid_call` | callee(s) | Forbids calling the listed functions |
//! | `require_pattern` | regex(es) | Requires matching content |
//! | `forbid_decorator` | decorator(s) | Forbids a decorator on any class |
//! | `max_public_methods` | number | Limits public methods on exported classes |
//!
//! ## Usage
//!
//! ```ignore
//! use archtag_core::{Resolver, ValidationContext};
//! use archtag_rules::ValidatorRegistry;
//!
//! let validators = ValidatorRegistry::new();
//! let resolved = Resolver::new().resolve(&registry, "app.service")?;
//! let findings = validators.validate_all(&resolved, &ValidationContext::new(&file));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod base;
mod forbid_call;
mod forbid_decorator;
mod forbid_import;
mod forbid_pattern;
mod max_file_lines;
mod max_public_methods;
mod naming_pattern;
mod registry;
mod require_decorator;
mod require_export;
mod require_import;
mod require_pattern;
mod unless;

#[cfg(test)]
mod test_support;

pub use forbid_call::ForbidCall;
pub use forbid_decorator::ForbidDecorator;
pub use forbid_import::ForbidImport;
pub use forbid_pattern::ForbidPattern;
pub use max_file_lines::MaxFileLines;
pub use max_public_methods::MaxPublicMethods;
pub use naming_pattern::NamingPattern;
pub use registry::{all_validators, ValidatorRegistry};
pub use require_decorator::RequireDecorator;
pub use require_export::RequireExport;
pub use require_import::RequireImport;
pub use require_pattern::RequirePattern;
pub use unless::structural_exemption;

/// Re-export core types for convenience.
pub use archtag_core::{ConstraintValidator, Severity, Violation};
