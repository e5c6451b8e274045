//! Structural `unless` conditions.
//!
//! | Condition | Holds when |
//! |-----------|------------|
//! | `import:<module>` | the file imports a matching module |
//! | `@<Decorator>` | any class carries the decorator |
//! | `path:<glob>` | the file path matches the glob |
//!
//! `@intent:` conditions are not evaluated here; they travel on each
//! violation to the override matcher.

use archtag_core::utils::module_matches;
use archtag_core::{Constraint, ValidationContext};

/// Returns the first structural condition that holds for the file.
#[must_use]
pub fn structural_exemption<'c>(
    constraint: &'c Constraint,
    ctx: &ValidationContext<'_>,
) -> Option<&'c str> {
    constraint
        .structural_exemptions()
        .find(|condition| holds(condition, ctx))
}

fn holds(condition: &str, ctx: &ValidationContext<'_>) -> bool {
    if let Some(module) = condition.strip_prefix("import:") {
        let module = module.trim();
        return ctx
            .model
            .imports
            .iter()
            .any(|i| module_matches(&i.module, module));
    }
    if let Some(glob) = condition.strip_prefix("path:") {
        return match glob::Pattern::new(glob.trim()) {
            Ok(pattern) => pattern.matches_path(ctx.path),
            Err(e) => {
                tracing::warn!(condition, error = %e, "ignoring unless condition with invalid glob");
                false
            }
        };
    }
    if let Some(decorator) = condition.strip_prefix('@') {
        return ctx.model.any_class_has_decorator(decorator.trim());
    }

    tracing::debug!(condition, "ignoring unrecognized unless condition");
    false
}
