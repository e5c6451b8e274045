//! Validator forbidding content that matches a regex.
//!
//! Each listed regex yields at most one violation, located at its first
//! match and counting the rest.

use crate::base;
use archtag_core::{
    ConstraintValidator, ResolvedConstraint, RuleKind, ValidationContext, ValidationOutcome,
};

/// Forbids content matching a pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForbidPattern;

impl ForbidPattern {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintValidator for ForbidPattern {
    fn rule(&self) -> RuleKind {
        RuleKind::ForbidPattern
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

        let mut violations = Vec::new();
        for pattern in &patterns {
            let re = match base::compile(constraint, pattern) {
                Ok(re) => re,
                Err(v) => {
                    violations.push(v);
                    continue;
                }
            };
            let mut matches = re.find_iter(ctx.content);
            let Some(first) = matches.next() else {
                continue;
            };
            let others = matches.count();
            let (line, column) = ctx.position_of(first.start());
            let message = if others == 0 {
                format!("Forbidden pattern `{pattern}` found: '{}'", first.as_str())
            } else {
                format!(
                    "Forbidden pattern `{pattern}` found: '{}' (and {others} more)",
                    first.as_str()
                )
            };
            let v = base::violation(constraint, message)
                .with_location(archtag_core::Location::new(ctx.path.to_path_buf(), line, column));
            violations.push(
                base::with_replacement(v, constraint, ctx, first.as_str()).with_entry(pattern.as_str()),
            );
        }

        ValidationOutcome::from_violations(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::resolved;
    use archtag_core::{Constraint, ConstraintValue, SourceFile};

    fn check(pattern: &str, content: &str) -> ValidationOutcome {
        let c = Constraint::new(RuleKind::ForbidPattern, ConstraintValue::Text(pattern.into()))
            .with_alternative("logger");
        let f = SourceFile::new("src/a.ts", content);
        ForbidPattern::new().validate(&resolved(c), &ValidationContext::new(&f))
    }

    #[test]
    fn test_reports_first_match_with_count() {
        let outcome = check(r"console\.\w+", "const a = 1;\nconsole.log(a);\nconsole.warn(a);\n");
        assert_eq!(outcome.violations.len(), 1);
        let v = &outcome.violations[0];
        assert!(v.message.contains("'console.log' (and 1 more)"));
        let loc = v.location.as_ref().unwrap();
        assert_eq!((loc.line, loc.column), (2, 1));
        assert_eq!(v.fix_hint.as_deref(), Some("Use `logger` instead"));
    }

    #[test]
    fn test_no_match_passes() {
        assert!(check(r"debugger", "const a = 1;\n").passed);
    }

    #[test]
    fn test_bad_regex_does_not_stop_others() {
        let c = Constraint::new(
            RuleKind::ForbidPattern,
            ConstraintValue::List(vec!["(".into(), "TODO".into()]),
        );
        let f = SourceFile::new("src/a.ts", "// TODO fix\n");
        let outcome = ForbidPattern::new().validate(&resolved(c), &ValidationContext::new(&f));
        assert_eq!(outcome.violations.len(), 2);
    }
}
