//! Validator limiting public methods on exported classes.

use crate::base;
use archtag_core::{
    ConstraintValidator, ResolvedConstraint, RuleKind, ValidationContext, ValidationOutcome,
};

/// Limits public methods on exported classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxPublicMethods;

impl MaxPublicMethods {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintValidator for MaxPublicMethods {
    fn rule(&self) -> RuleKind {
        RuleKind::MaxPublicMethods
    }

    fn validate(
        &self,
        constraint: &ResolvedConstraint,
        ctx: &ValidationContext<'_>,
    ) -> ValidationOutcome {
        let limit = match base::expect_limit(constraint) {
            Ok(n) => n,
            Err(v) => return ValidationOutcome::fail(v),
        };

        let violations = ctx
            .model
            .exported_classes()
            .filter(|c| c.public_methods.len() > limit)
            .map(|c| {
                base::violation_at(
                    constraint,
                    ctx,
                    c.line,
                    format!(
                        "Class '{}' has {} public methods, exceeding the limit of {limit}",
                        c.name,
                        c.public_methods.len()
                    ),
                )
                .with_fix_hint("Split responsibilities into smaller classes")
            })
            .collect();

        ValidationOutcome::from_violations(violations)
    }
}
