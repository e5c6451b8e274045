//! Validator forbidding decorators on any class.

use crate::base;
use archtag_core::{
    ConstraintValidator, ResolvedConstraint, RuleKind, ValidationContext, ValidationOutcome,
};

/// Forbids a decorator on any class.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForbidDecorator;

impl ForbidDecorator {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintValidator for ForbidDecorator {
    fn rule(&self) -> RuleKind {
        RuleKind::ForbidDecorator
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

        let mut violations = Vec::new();
        for class in &ctx.model.classes {
            for decorator in forbidden.iter().filter(|d| class.has_decorator(d)) {
                let name = decorator.trim_start_matches('@');
                let v = base::violation_at(
                    constraint,
                    ctx,
                    class.line,
                    format!("Class '{}' must not use @{name}", class.name),
                );
                violations.push(
                    base::with_replacement(v, constraint, ctx, name).with_entry(decorator.as_str()),
                );
            }
        }

        ValidationOutcome::from_violations(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{file_with, resolved};
    use archtag_core::{ClassInfo, Constraint, ConstraintValue, SemanticModel};

    #[test]
    fn test_flags_every_class_with_decorator() {
        let class = |name: &str, exported: bool| ClassInfo {
            name: name.to_string(),
            exported,
            decorators: vec!["Entity".into()],
            public_methods: vec![],
            line: 1,
        };
        let model = SemanticModel {
            classes: vec![class("User", true), class("Internal", false)],
            ..SemanticModel::default()
        };
        let file = file_with("src/domain/user.ts", model);
        let c = Constraint::new(RuleKind::ForbidDecorator, ConstraintValue::Text("@Entity".into()));
        let outcome = ForbidDecorator::new().validate(&resolved(c), &ValidationContext::new(&file));
        assert_eq!(outcome.violations.len(), 2);
        assert_eq!(outcome.violations[0].message, "Class 'User' must not use @Entity");
    }

    #[test]
    fn test_no_classes_passes() {
        let file = file_with("src/a.ts", SemanticModel::default());
        let c = Constraint::new(RuleKind::ForbidDecorator, ConstraintValue::Text("Entity".into()));
        assert!(ForbidDecorator::new()
            .validate(&resolved(c), &ValidationContext::new(&file))
            .passed);
    }
}
