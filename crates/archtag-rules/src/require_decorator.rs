//! Validator requiring a decorator on every exported class.
//!
//! A list value combines per class with the constraint's `match` mode.
//! Violations report the decorators the class actually carries.

use crate::base;
use archtag_core::{
    ClassInfo, ConstraintValidator, MatchMode, ResolvedConstraint, RuleKind, ValidationContext,
    ValidationOutcome,
};

/// Requires a decorator on every exported class.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireDecorator;

impl RequireDecorator {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintValidator for RequireDecorator {
    fn rule(&self) -> RuleKind {
        RuleKind::RequireDecorator
    }

    fn validate(
        &self,
        constraint: &ResolvedConstraint,
        ctx: &ValidationContext<'_>,
    ) -> ValidationOutcome {
        let required = match base::expect_list(constraint) {
            Ok(list) => list,
            Err(v) => return ValidationOutcome::fail(v),
        };
        let mode = constraint.constraint.match_mode;

        let mut violations = Vec::new();
        for class in ctx.model.exported_classes() {
            let missing: Vec<&String> = required
                .iter()
                .filter(|d| !class.has_decorator(d))
                .collect();
            let failed = match mode {
                MatchMode::All => !missing.is_empty(),
                MatchMode::Any => missing.len() == required.len(),
            };
            if !failed {
                continue;
            }

            let wanted: Vec<String> = match mode {
                MatchMode::All => missing.iter().map(|d| at(d)).collect(),
                MatchMode::Any => required.iter().map(|d| at(d)).collect(),
            };
            let joiner = if mode == MatchMode::Any { " or " } else { ", " };
            violations.push(
                base::violation_at(
                    constraint,
                    ctx,
                    class.line,
                    format!(
                        "Exported class '{}' is missing {} (has: {})",
                        class.name,
                        wanted.join(joiner),
                        actual(class)
                    ),
                )
                .with_fix_hint(format!("Add {} to '{}'", wanted.join(joiner), class.name)),
            );
        }

        ValidationOutcome::from_violations(violations)
    }
}

fn at(name: &str) -> String {
    format!("@{}", name.trim_start_matches('@'))
}

fn actual(class: &ClassInfo) -> String {
    if class.decorators.is_empty() {
        "none".to_string()
    } else {
        class
            .decorators
            .iter()
            .map(|d| at(d))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{file_with, resolved};
    use archtag_core::{Constraint, ConstraintValue, SemanticModel};

    fn class(name: &str, exported: bool, decorators: &[&str]) -> ClassInfo {
        ClassInfo {
            name: name.to_string(),
            exported,
            decorators: decorators.iter().map(ToString::to_string).collect(),
            public_methods: vec![],
            line: 3,
        }
    }

    fn check(constraint: Constraint, classes: Vec<ClassInfo>) -> ValidationOutcome {
        let model = SemanticModel {
            classes,
            ..SemanticModel::default()
        };
        let file = file_with("src/user.controller.ts", model);
        RequireDecorator::new().validate(&resolved(constraint), &ValidationContext::new(&file))
    }

    fn require(value: ConstraintValue) -> Constraint {
        Constraint::new(RuleKind::RequireDecorator, value)
    }

    #[test]
    fn test_reports_actual_decorators() {
        let outcome = check(
            require(ConstraintValue::Text("@Controller".into())),
            vec![class("UserController", true, &["Injectable", "Deprecated"])],
        );
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(
            outcome.violations[0].message,
            "Exported class 'UserController' is missing @Controller (has: @Injectable, @Deprecated)"
        );
    }

    #[test]
    fn test_ignores_unexported_classes() {
        let outcome = check(
            require(ConstraintValue::Text("Controller".into())),
            vec![class("Helper", false, &[]), class("UserController", true, &["Controller"])],
        );
        assert!(outcome.passed);
    }

    #[test]
    fn test_any_mode() {
        let c = require(ConstraintValue::List(vec!["Controller".into(), "Resolver".into()]))
            .with_match(MatchMode::Any);
        assert!(check(c.clone(), vec![class("A", true, &["Resolver"])]).passed);
        let outcome = check(c, vec![class("A", true, &[])]);
        assert!(outcome.violations[0].message.contains("@Controller or @Resolver"));
        assert!(outcome.violations[0].message.contains("(has: none)"));
    }
}
