//! Validator trait for rule kinds.

use crate::context::ValidationContext;
use crate::registry::model::RuleKind;
use crate::resolver::ResolvedConstraint;
use crate::types::Violation;

/// Checks one rule kind against one file.
///
/// Validators are pure functions of (constraint, context): they never
/// mutate the context and hold no per-file state, so one instance serves
/// every worker thread.
///
/// # Example
///
/// ```ignore
/// use archtag_core::{ConstraintValidator, ResolvedConstraint, RuleKind,
///     ValidationContext, ValidationOutcome};
///
/// pub struct MaxFileLines;
///
/// impl ConstraintValidator for MaxFileLines {
///     fn rule(&self) -> RuleKind { RuleKind::MaxFileLines }
///
///     fn validate(&self, c: &ResolvedConstraint, ctx: &ValidationContext) -> ValidationOutcome {
///         // ...
///         ValidationOutcome::pass()
///     }
/// }
/// ```
pub trait ConstraintValidator: Send + Sync {
    /// The rule kind this validator implements.
    fn rule(&self) -> RuleKind;

    /// Returns a brief description of what this validator checks.
    fn description(&self) -> &'static str {
        self.rule().description()
    }

    /// Checks the file against the constraint.
    ///
    /// Malformed constraint data is reported as a violation, never a panic.
    fn validate(
        &self,
        constraint: &ResolvedConstraint,
        ctx: &ValidationContext<'_>,
    ) -> ValidationOutcome;
}

/// Type alias for boxed validator trait objects.
pub type ValidatorBox = Box<dyn ConstraintValidator>;

/// The result of one validator call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Whether the constraint holds.
    pub passed: bool,
    /// Findings, empty when passed.
    pub violations: Vec<Violation>,
}

impl ValidationOutcome {
    /// A passing outcome.
    #[must_use]
    pub fn pass() -> Self {
        Self {
            passed: true,
            violations: Vec::new(),
        }
    }

    /// Passes exactly when there are no violations.
    #[must_use]
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            passed: violations.is_empty(),
            violations,
        }
    }

    /// A failing outcome with one violation.
    #[must_use]
    pub fn fail(violation: Violation) -> Self {
        Self {
            passed: false,
            violations: vec![violation],
        }
    }
}
