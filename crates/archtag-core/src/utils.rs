//! Utility functions for validator implementations.

pub mod paths;

#[doc(inline)]
pub use paths::{callee_matches, module_matches, name_matches};
