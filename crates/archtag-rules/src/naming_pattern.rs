//! Validator requiring the file name to match a regex.

use crate::base;
use archtag_core::{
    ConstraintValidator, ResolvedConstraint, RuleKind, ValidationContext, ValidationOutcome,
};

/// Requires the file name to match a pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamingPattern;

impl NamingPattern {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintValidator for NamingPattern {
    fn rule(&self) -> RuleKind {
        RuleKind::NamingPattern
    }

    fn validate(
        &self,
        constraint: &ResolvedConstraint,
        ctx: &ValidationContext<'_>,
    ) -> ValidationOutcome {
        let pattern = match base::expect_text(constraint) {
            Ok(text) => text,
            Err(v) => return ValidationOutcome::fail(v),
        };
        let re = match base::compile(constraint, &pattern) {
            Ok(re) => re,
            Err(v) => return ValidationOutcome::fail(v),
        };

        let name = ctx.file_name();
        if re.is_match(name) {
            return ValidationOutcome::pass();
        }
        ValidationOutcome::fail(
            base::violation(
                constraint,
                format!("File name '{name}' does not match pattern `{pattern}`"),
            )
            .with_fix_hint("Rename the file to follow the naming convention"),
        )
    }
}
