//! Validator requiring content that matches a regex.

use crate::base;
use archtag_core::{
    ConstraintValidator, MatchMode, ResolvedConstraint, RuleKind, ValidationContext,
    ValidationOutcome,
};

/// Requires content matching a pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequirePattern;

impl RequirePattern {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintValidator for RequirePattern {
    fn rule(&self) -> RuleKind {
        RuleKind::RequirePattern
    }

    fn validate(
        &self,
        constraint: &ResolvedConstraint,
        ctx: &ValidationContext<'_>,
    ) -> ValidationOutcome {
        let patterns = match base::expect_list(constraint) {
            Ok(list) => list,
            Err(v) => return ValidationOutcome::fail(v),
        };

        let mut missing = Vec::new();
        for pattern in &patterns {
            match base::compile(constraint, pattern) {
                Ok(re) if re.is_match(ctx.content) => {}
                Ok(_) => missing.push(pattern.as_str()),
                Err(v) => return ValidationOutcome::fail(v),
            }
        }

        match constraint.constraint.match_mode {
            MatchMode::Any if missing.len() < patterns.len() => ValidationOutcome::pass(),
            MatchMode::Any => ValidationOutcome::fail(base::violation(
                constraint,
                format!(
                    "Content matches none of the required patterns: {}",
                    missing.join(", ")
                ),
            )),
            MatchMode::All => ValidationOutcome::from_violations(
                missing
                    .into_iter()
                    .map(|p| {
                        base::violation(constraint, format!("Required pattern `{p}` not found"))
                            .with_entry(p)
                    })
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::resolved;
    use archtag_core::{Constraint, ConstraintValue, SourceFile};

    fn check(constraint: Constraint, content: &str) -> ValidationOutcome {
        let f = SourceFile::new("src/a.ts", content);
        RequirePattern::new().validate(&resolved(constraint), &ValidationContext::new(&f))
    }

    #[test]
    fn test_present_pattern_passes() {
        let c = Constraint::new(
            RuleKind::RequirePattern,
            ConstraintValue::Text(r#"^'use strict'"#.into()),
        );
        assert!(check(c, "'use strict';\n").passed);
    }

    #[test]
    fn test_all_reports_each_missing() {
        let c = Constraint::new(
            RuleKind::RequirePattern,
            ConstraintValue::List(vec!["alpha".into(), "beta".into(), "gamma".into()]),
        );
        let outcome = check(c, "alpha\n");
        assert_eq!(outcome.violations.len(), 2);
    }

    #[test]
    fn test_any_needs_one() {
        let c = Constraint::new(
            RuleKind::RequirePattern,
            ConstraintValue::List(vec!["alpha".into(), "beta".into()]),
        )
        .with_match(MatchMode::Any);
        assert!(check(c.clone(), "beta\n").passed);
        assert_eq!(check(c, "none\n").violations.len(), 1);
    }
}
