//! Validator requiring imports of listed modules.
//!
//! An entry is present when some import's specifier matches it, or when it
//! names a binding (named or default) some import provides.
//!
//! With `match: all` (the default) each missing entry is reported with an
//! import statement to add. With `match: any` one present entry suffices.

use crate::base;
use archtag_core::utils::module_matches;
use archtag_core::{
    ConstraintValidator, MatchMode, ResolvedConstraint, RuleKind, ValidationContext,
    ValidationOutcome,
};

/// Requires importing the listed modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireImport;

impl RequireImport {
    /// Creates the validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintValidator for RequireImport {
    fn rule(&self) -> RuleKind {
        RuleKind::RequireImport
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

        let is_present = |entry: &str| {
            ctx.model
                .imports
                .iter()
                .any(|i| module_matches(&i.module, entry) || i.provides(entry))
        };
        let missing: Vec<&String> = required.iter().filter(|r| !is_present(r.as_str())).collect();

        match constraint.constraint.match_mode {
            MatchMode::Any if missing.len() < required.len() => ValidationOutcome::pass(),
            MatchMode::Any => {
                let v = base::violation(
                    constraint,
                    format!(
                        "Missing required import: expected at least one of {}",
                        required.join(", ")
                    ),
                )
                .with_suggestion(base::add_import(ctx, &required[0]));
                ValidationOutcome::fail(v)
            }
            MatchMode::All => ValidationOutcome::from_violations(
                missing
                    .into_iter()
                    .map(|entry| {
                        base::violation(constraint, format!("Missing required import '{entry}'"))
                            .with_entry(entry.as_str())
                            .with_suggestion(base::add_import(ctx, entry))
                    })
                    .collect(),
            ),
        }
    }
}
