//! Validator requiring listed exports.
//!
//! Entries match export names exactly or with `*` wildcards (`*Service`,
//! `use*`). The entry `default` is satisfied by any default export. When a
//! `pattern` regex is set, an export matching it also satisfies an entry
//! whose name (wildcards stripped) it contains.

use crate::base;
use archtag_core::utils::name_matches;
use archtag_core::{
    ConstraintValidator, MatchMode, ResolvedConstraint, RuleKind, ValidationContext,
    ValidationOutcome,
};

/// Requires the listed exports to exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireExport;

impl RequireExport {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintValidator for RequireExport {
    fn rule(&self) -> RuleKind {
        RuleKind::RequireExport
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
        let refine = match base::refining_pattern(constraint) {
            Ok(re) => re,
            Err(v) => return ValidationOutcome::fail(v),
        };

        let exports = &ctx.model.exports;
        let refined = |name: &str, entry: &str| {
            let stem = entry.trim_matches('*');
            !stem.is_empty()
                && name.contains(stem)
                && refine.as_ref().is_some_and(|re| re.is_match(name))
        };

        let is_present = |entry: &str| {
            (entry == "default" && ctx.model.default_export().is_some())
                || exports
                    .iter()
                    .any(|e| name_matches(&e.name, entry) || refined(&e.name, entry))
        };
        let missing: Vec<&String> = required.iter().filter(|r| !is_present(r.as_str())).collect();

        match constraint.constraint.match_mode {
            MatchMode::Any if missing.len() < required.len() => ValidationOutcome::pass(),
            MatchMode::Any => ValidationOutcome::fail(
                base::violation(
                    constraint,
                    format!(
                        "Missing required export: expected at least one of {}",
                        required.join(", ")
                    ),
                )
                .with_fix_hint(found_exports(ctx)),
            ),
            MatchMode::All => ValidationOutcome::from_violations(
                missing
                    .into_iter()
                    .map(|entry| {
                        base::violation(constraint, format!("Missing required export '{entry}'"))
                            .with_entry(entry.as_str())
                            .with_fix_hint(found_exports(ctx))
                    })
                    .collect(),
            ),
        }
    }
}

fn found_exports(ctx: &ValidationContext<'_>) -> String {
    if ctx.model.exports.is_empty() {
        "The file has no exports".to_string()
    } else {
        let names: Vec<&str> = ctx.model.exports.iter().map(|e| e.name.as_str()).collect();
        format!("Found exports: {}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{file_with, resolved};
    use archtag_core::{Constraint, ConstraintValue, Export, SemanticModel};

    fn export(name: &str, is_default: bool) -> Export {
        Export {
            name: name.to_string(),
            is_default,
            line: 1,
        }
    }

    fn check(constraint: Constraint, exports: Vec<Export>) -> ValidationOutcome {
        let model = SemanticModel {
            exports,
            ..SemanticModel::default()
        };
        let file = file_with("src/user.service.ts", model);
        RequireExport::new().validate(&resolved(constraint), &ValidationContext::new(&file))
    }

    fn require(value: &str) -> Constraint {
        Constraint::new(RuleKind::RequireExport, ConstraintValue::Text(value.into()))
    }

    #[test]
    fn test_exact_match() {
        assert!(check(require("UserService"), vec![export("UserService", false)]).passed);
        let outcome = check(require("UserService"), vec![export("Other", false)]);
        assert!(!outcome.passed);
        assert_eq!(outcome.violations[0].fix_hint.as_deref(), Some("Found exports: Other"));
    }

    #[test]
    fn test_suffix_and_prefix_wildcards() {
        assert!(check(require("*Service"), vec![export("UserService", false)]).passed);
        assert!(check(require("use*"), vec![export("useAuth", false)]).passed);
        assert!(!check(require("*Service"), vec![export("UserController", false)]).passed);
    }

    #[test]
    fn test_default_matches_any_default_export() {
        assert!(check(require("default"), vec![export("Whatever", true)]).passed);
        assert!(!check(require("default"), vec![export("Whatever", false)]).passed);
    }

    #[test]
    fn test_regex_pattern() {
        let c = require("Handler").with_pattern("^[A-Z][a-z]+Handler$");
        assert!(check(c.clone(), vec![export("OrderHandler", false)]).passed);
        assert!(!check(c, vec![export("handler", false)]).passed);
    }

    #[test]
    fn test_regex_pattern_satisfies_only_related_entries() {
        let c = Constraint::new(
            RuleKind::RequireExport,
            ConstraintValue::List(vec!["Foo".into(), "Bar".into()]),
        )
        .with_pattern("^Foo[A-Z]\\w*$");
        let outcome = check(c, vec![export("FooStore", false)]);
        assert!(!outcome.passed);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].message, "Missing required export 'Bar'");
        assert_eq!(outcome.violations[0].entry.as_deref(), Some("Bar"));
    }

    #[test]
    fn test_empty_exports_hint() {
        let outcome = check(require("Foo"), vec![]);
        assert_eq!(
            outcome.violations[0].fix_hint.as_deref(),
            Some("The file has no exports")
        );
    }
}
