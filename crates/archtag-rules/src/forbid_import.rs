//! Validator forbidding imports of listed modules.
//!
//! Entries match by module specifier with `/`-segment wildcards
//! (`lodash`, `@aws-sdk/*`, `**/infra/**`). An optional `pattern` regex
//! additionally forbids any specifier it matches.

use crate::base;
use archtag_core::utils::module_matches;
use archtag_core::{
    ConstraintValidator, ResolvedConstraint, RuleKind, ValidationContext, ValidationOutcome,
};

/// Forbids importing the listed modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForbidImport;

impl ForbidImport {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintValidator for ForbidImport {
    fn rule(&self) -> RuleKind {
        RuleKind::ForbidImport
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
            .imports
            .iter()
            .filter_map(|import| {
                let hit = forbidden
                    .iter()
                    .find(|f| module_matches(&import.module, f))
                    .map(String::as_str)
                    .or_else(|| {
                        refine
                            .as_ref()
                            .filter(|re| re.is_match(&import.module))
                            .map(|_| import.module.as_str())
                    })?;
                let v = base::violation_at(
                    constraint,
                    ctx,
                    import.line,
                    format!("Import of '{}' is forbidden", import.module),
                );
                Some(base::with_replacement(v, constraint, ctx, hit).with_entry(hit))
            })
            .collect();

        ValidationOutcome::from_violations(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{file_with, resolved};
    use archtag_core::{Constraint, ConstraintValue, Import, SemanticModel};

    fn check(constraint: Constraint, modules: &[&str]) -> ValidationOutcome {
        let model = SemanticModel {
            imports: modules
                .iter()
                .enumerate()
                .map(|(i, m)| Import::new(*m, i + 1))
                .collect(),
            ..SemanticModel::default()
        };
        let file = file_with("src/app.ts", model);
        ForbidImport::new().validate(&resolved(constraint), &ValidationContext::new(&file))
    }

    fn forbid(value: ConstraintValue) -> Constraint {
        Constraint::new(RuleKind::ForbidImport, value)
    }

    #[test]
    fn test_detects_forbidden_import() {
        let outcome = check(
            forbid(ConstraintValue::Text("lodash".into())),
            &["react", "lodash/fp"],
        );
        assert!(!outcome.passed);
        assert_eq!(outcome.violations.len(), 1);
        let v = &outcome.violations[0];
        assert_eq!(v.key, "forbid_import:lodash");
        assert_eq!(v.location.as_ref().unwrap().line, 2);
        assert!(v.message.contains("lodash/fp"));
    }

    #[test]
    fn test_passes_without_forbidden_import() {
        let outcome = check(
            forbid(ConstraintValue::List(vec!["axios".into(), "lodash".into()])),
            &["react", "lodash-es"],
        );
        assert!(outcome.passed);
    }

    #[test]
    fn test_refining_pattern() {
        let outcome = check(
            forbid(ConstraintValue::Text("axios".into())).with_pattern(r"^\.\./\.\./"),
            &["../../infra/db", "./local"],
        );
        assert_eq!(outcome.violations.len(), 1);
        assert!(outcome.violations[0].message.contains("../../infra/db"));
    }

    #[test]
    fn test_numeric_value_is_reported() {
        let outcome = check(forbid(ConstraintValue::Number(1)), &["lodash"]);
        assert!(!outcome.passed);
        assert!(outcome.violations[0].message.contains("misconfigured"));
    }
}
