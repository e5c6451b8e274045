//! Lookup table from rule kind to validator.

use crate::base;
use crate::unless::structural_exemption;
use crate::{
    ForbidCall, ForbidDecorator, ForbidImport, ForbidPattern, MaxFileLines, MaxPublicMethods,
    NamingPattern, RequireDecorator, RequireExport, RequireImport, RequirePattern,
};
use archtag_core::{
    ResolvedArchitecture, ResolvedConstraint, RuleKind, ValidationContext, ValidationOutcome,
    ValidatorBox, Violation,
};
use std::collections::HashMap;

/// Returns one validator per rule kind, in catalog order.
#[must_use]
pub fn all_validators() -> Vec<ValidatorBox> {
    vec![
        Box::new(ForbidImport::new()),
        Box::new(RequireImport::new()),
        Box::new(RequireExport::new()),
        Box::new(RequireDecorator::new()),
        Box::new(NamingPattern::new()),
        Box::new(MaxFileLines::new()),
        Box::new(ForbidPattern::new()),
        Box::new(ForbidCall::new()),
        Box::new(RequirePattern::new()),
        Box::new(ForbidDecorator::new()),
        Box::new(MaxPublicMethods::new()),
    ]
}

/// Dispatches resolved constraints to their validators.
///
/// Built once and shared read-only by every worker.
pub struct ValidatorRegistry {
    validators: HashMap<RuleKind, ValidatorBox>,
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("rules", &self.rules())
            .finish()
    }
}

impl ValidatorRegistry {
    /// Creates a registry with every built-in validator.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for validator in all_validators() {
            registry.register(validator);
        }
        registry
    }

    /// Creates a registry with no validators.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Adds a validator, replacing any previous one for the same rule.
    pub fn register(&mut self, validator: ValidatorBox) {
        self.validators.insert(validator.rule(), validator);
    }

    /// Rule kinds with a validator, in catalog order.
    #[must_use]
    pub fn rules(&self) -> Vec<RuleKind> {
        RuleKind::ALL
            .into_iter()
            .filter(|k| self.validators.contains_key(k))
            .collect()
    }

    /// Number of registered validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true if no validators are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Validates one constraint.
    ///
    /// Constraints whose rule is disabled for the file's language, or whose
    /// structural `unless` condition holds, pass without dispatch.
    #[must_use]
    pub fn validate(
        &self,
        constraint: &ResolvedConstraint,
        ctx: &ValidationContext<'_>,
    ) -> ValidationOutcome {
        let rule = constraint.constraint.rule;
        if !rule.is_enabled_for(ctx.language) {
            tracing::debug!(key = %constraint.key, language = ?ctx.language, "rule disabled for language");
            return ValidationOutcome::pass();
        }
        if let Some(condition) = structural_exemption(&constraint.constraint, ctx) {
            tracing::debug!(key = %constraint.key, condition, "constraint exempted");
            return ValidationOutcome::pass();
        }

        match self.validators.get(&rule) {
            Some(validator) => validator.validate(constraint, ctx),
            None => ValidationOutcome::fail(base::misconfigured(
                constraint,
                format!("no validator registered for rule `{rule}`"),
            )),
        }
    }

    /// Validates every constraint of a resolved architecture and returns
    /// the raw findings in constraint order.
    #[must_use]
    pub fn validate_all(
        &self,
        resolved: &ResolvedArchitecture,
        ctx: &ValidationContext<'_>,
    ) -> Vec<Violation> {
        resolved
            .constraints
            .iter()
            .flat_map(|c| self.validate(c, ctx).violations)
            .collect()
    }
}
