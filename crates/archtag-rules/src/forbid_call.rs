//! Validator forbidding calls to listed functions.
//!
//! Entries match dotted callees (`eval`, `console.log`, `fs.*Sync`). An
//! optional `pattern` regex additionally forbids any callee it matches.

use crate::base;
use archtag_core::utils::callee_matches;
use archtag_core::{
    ConstraintValidator, ResolvedConstraint, RuleKind, ValidationContext, ValidationOutcome,
};

/// Forbids calling the listed functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForbidCall;

impl ForbidCall {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintValidator for ForbidCall {
    fn rule(&self) -> RuleKind {
        RuleKind::ForbidCall
    }

    fn validate(
        &self,
        constraint: &ResolvedConstraint,
        ctx: &ValidationContext<'_>,
    ) -> ValidationOutcome {
        let forbidden = match base::expect_list(constraint) {
            Ok(list) => list,
            Err(v) => return ValidationOutcome::fail(v),
        };
        let refine = match base::refining_pattern(constraint) {
            Ok(re) => re,
            Err(v) => return ValidationOutcome::fail(v),
        };

        let violations = ctx
            .model
            .calls
            .iter()
            .filter_map(|call| {
                let entry = forbidden
                    .iter()
                    .find(|f| callee_matches(&call.callee, f))
                    .map(String::as_str)
                    .or_else(|| {
                        refine
                            .as_ref()
                            .filter(|re| re.is_match(&call.callee))
                            .map(|_| call.callee.as_str())
                    })?;
                let v = base::violation_at(
                    constraint,
                    ctx,
                    call.line,
                    format!("Call to '{}' is forbidden", call.callee),
                );
                Some(base::with_replacement(v, constraint, ctx, &call.callee).with_entry(entry))
            })
            .collect();

        ValidationOutcome::from_violations(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{file_with, resolved};
    use archtag_core::{CallSite, Constraint, ConstraintValue, SemanticModel};

    fn check(constraint: Constraint, callees: &[&str]) -> ValidationOutcome {
        let model = SemanticModel {
            calls: callees
                .iter()
                .enumerate()
                .map(|(i, c)| CallSite {
                    callee: (*c).to_string(),
                    line: i + 1,
                })
                .collect(),
            ..SemanticModel::default()
        };
        let file = file_with("src/app.ts", model);
        ForbidCall::new().validate(&resolved(constraint), &ValidationContext::new(&file))
    }

    #[test]
    fn test_detects_each_call() {
        let c = Constraint::new(
            RuleKind::ForbidCall,
            ConstraintValue::List(vec!["eval".into(), "console.*".into()]),
        )
        .with_alternative("logger.info");
        let outcome = check(c, &["eval", "logger.info", "console.log"]);
        assert_eq!(outcome.violations.len(), 2);
        assert_eq!(outcome.violations[1].location.as_ref().unwrap().line, 3);
        let s = outcome.violations[1].suggestion.as_ref().unwrap();
        assert_eq!(s.target, "console.log");
        assert_eq!(s.replacement.as_deref(), Some("logger.info"));
        assert!(s.import_statement.is_none());
    }

    #[test]
    fn test_refining_pattern() {
        let c = Constraint::new(RuleKind::ForbidCall, ConstraintValue::Text("eval".into()))
            .with_pattern(r"Sync$");
        let outcome = check(c, &["fs.readFileSync", "fs.readFile"]);
        assert_eq!(outcome.violations.len(), 1);
    }

    #[test]
    fn test_clean_file_passes() {
        let c = Constraint::new(RuleKind::ForbidCall, ConstraintValue::Text("eval".into()));
        assert!(check(c, &["evaluate", "JSON.parse"]).passed);
    }
}
