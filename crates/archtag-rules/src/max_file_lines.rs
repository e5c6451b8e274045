//! Validator limiting the number of lines in a file.

use crate::base;
use archtag_core::{
    ConstraintValidator, ResolvedConstraint, RuleKind, ValidationContext, ValidationOutcome,
};

/// Limits the number of lines in a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxFileLines;

impl MaxFileLines {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintValidator for MaxFileLines {
    fn rule(&self) -> RuleKind {
        RuleKind::MaxFileLines
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

        let lines = ctx.line_count();
        if lines <= limit {
            return ValidationOutcome::pass();
        }
        ValidationOutcome::fail(
            base::violation_at(
                constraint,
                ctx,
                limit + 1,
                format!("File has {lines} lines, exceeding the limit of {limit}"),
            )
            .with_fix_hint("Split the file into smaller modules"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::resolved;
    use archtag_core::{Constraint, ConstraintValue, SourceFile};

    fn check(limit: ConstraintValue, lines: usize) -> ValidationOutcome {
        let c = Constraint::new(RuleKind::MaxFileLines, limit);
        let f = SourceFile::new("src/big.ts", "line\n".repeat(lines));
        MaxFileLines::new().validate(&resolved(c), &ValidationContext::new(&f))
    }

    #[test]
    fn test_within_limit() {
        assert!(check(ConstraintValue::Number(3), 3).passed);
    }

    #[test]
    fn test_over_limit() {
        let outcome = check(ConstraintValue::Number(3), 5);
        let v = &outcome.violations[0];
        assert!(v.message.contains("5 lines"));
        assert_eq!(v.location.as_ref().unwrap().line, 4);
    }

    #[test]
    fn test_string_number_is_accepted() {
        assert!(check(ConstraintValue::Text("10".into()), 5).passed);
    }

    #[test]
    fn test_negative_limit_is_misconfiguration() {
        let outcome = check(ConstraintValue::Number(-1), 1);
        assert!(outcome.violations[0].message.contains("misconfigured"));
    }
}
