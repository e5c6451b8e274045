//! Override and exemption matching.
//!
//! A violation can be suppressed two ways:
//!
//! - an inline override annotation on the file whose target key matches the
//!   violation, carrying every required field and not expired (or expired
//!   while `fail_on_expired_override` is off);
//! - an `@intent:X` entry in the constraint's `unless` list when the file
//!   declares intent `X`.
//!
//! Only the first kind counts toward `overridden_count`.

use crate::registry::model::normalize_intent;
use crate::types::{synthetic, OverrideDebt, Severity, Violation};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A field an override annotation may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideField {
    /// Justification.
    Reason,
    /// Expiry date.
    Expires,
    /// Issue tracker reference.
    Ticket,
    /// Who approved it.
    ApprovedBy,
}

impl OverrideField {
    /// Returns the annotation field name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reason => "reason",
            Self::Expires => "expires",
            Self::Ticket => "ticket",
            Self::ApprovedBy => "approved_by",
        }
    }
}

impl fmt::Display for OverrideField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-file override annotation, already extracted from the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    /// Target: a rule name, a full constraint key, or `rule:<entry>` for one
    /// entry of a list constraint.
    pub rule: String,
    /// Justification.
    #[serde(default)]
    pub reason: Option<String>,
    /// Expiry date.
    #[serde(default)]
    pub expires: Option<NaiveDate>,
    /// Issue tracker reference.
    #[serde(default)]
    pub ticket: Option<String>,
    /// Approver.
    #[serde(default)]
    pub approved_by: Option<String>,
    /// Line of the annotation.
    #[serde(default)]
    pub line: Option<usize>,
}

impl Override {
    /// Creates an override with a reason.
    #[must_use]
    pub fn new(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            reason: Some(reason.into()),
            expires: None,
            ticket: None,
            approved_by: None,
            line: None,
        }
    }

    /// Sets the expiry date.
    #[must_use]
    pub fn expiring(mut self, date: NaiveDate) -> Self {
        self.expires = Some(date);
        self
    }

    /// Whether this override targets the violation.
    ///
    /// Accepts the full constraint key, the bare rule name, or
    /// `rule:<entry>` naming the one list entry the violation is about.
    #[must_use]
    pub fn targets(&self, violation: &Violation) -> bool {
        let target = self.rule.trim();
        if target == violation.key || target == violation.rule {
            return true;
        }
        let Some(entry) = violation.entry.as_deref() else {
            return false;
        };
        target
            .strip_prefix(violation.rule.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .is_some_and(|t| t.trim() == entry)
    }

    /// Whether the override is past its expiry date.
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires.is_some_and(|d| d < today)
    }

    /// Required fields this override does not carry.
    #[must_use]
    pub fn missing_fields(&self, required: &[OverrideField]) -> Vec<OverrideField> {
        required
            .iter()
            .copied()
            .filter(|f| !self.has_field(*f))
            .collect()
    }

    fn has_field(&self, field: OverrideField) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        match field {
            OverrideField::Reason => present(&self.reason),
            OverrideField::Expires => self.expires.is_some(),
            OverrideField::Ticket => present(&self.ticket),
            OverrideField::ApprovedBy => present(&self.approved_by),
        }
    }
}

/// Settings for reconciliation, taken from config.
#[derive(Debug, Clone)]
pub struct OverridePolicy {
    /// Fields every override must carry. `reason` is always enforced.
    pub required_fields: Vec<OverrideField>,
    /// Whether an expired override stops suppressing.
    pub fail_on_expired: bool,
    /// Active overrides allowed per file before it is flagged.
    pub max_per_file: usize,
    /// The date expiry is judged against.
    pub today: NaiveDate,
}

impl OverridePolicy {
    /// Creates a policy with `reason` required, strict expiry and a limit of 20.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            required_fields: vec![OverrideField::Reason],
            fail_on_expired: true,
            max_per_file: 20,
            today,
        }
    }

    fn required(&self) -> Vec<OverrideField> {
        let mut fields = self.required_fields.clone();
        if !fields.contains(&OverrideField::Reason) {
            fields.insert(0, OverrideField::Reason);
        }
        fields
    }
}

/// Result of reconciling a file's raw findings.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Findings that survive.
    pub kept: Vec<Violation>,
    /// Findings suppressed by a usable override.
    pub overridden_count: usize,
    /// Findings suppressed by an intent exemption.
    pub exempted_count: usize,
    /// Warnings about the overrides themselves (invalid, expired).
    pub notes: Vec<Violation>,
    /// Overrides that were allowed to suppress.
    pub active_overrides: usize,
    /// Set when `active_overrides` exceeds the limit.
    pub debt: Option<OverrideDebt>,
}

/// Filters raw findings through the file's overrides and intents.
#[must_use]
pub fn reconcile(
    violations: Vec<Violation>,
    overrides: &[Override],
    intents: &[String],
    policy: &OverridePolicy,
) -> Reconciliation {
    let mut result = Reconciliation::default();
    let required = policy.required();

    let mut usable: Vec<&Override> = Vec::new();
    for ov in overrides {
        let missing = ov.missing_fields(&required);
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
            result.notes.push(
                Violation::synthetic(
                    synthetic::OVERRIDE_INVALID,
                    Severity::Warning,
                    format!(
                        "Override for '{}' is missing required field(s): {}",
                        ov.rule,
                        names.join(", ")
                    ),
                )
                .with_fix_hint("Add the missing fields to the override annotation"),
            );
            continue;
        }

        if ov.is_expired(policy.today) {
            let expires = ov.expires.map(|d| d.to_string()).unwrap_or_default();
            let message = if policy.fail_on_expired {
                format!("Override for '{}' expired on {expires} and no longer applies", ov.rule)
            } else {
                format!("Override for '{}' expired on {expires}", ov.rule)
            };
            result.notes.push(
                Violation::synthetic(synthetic::OVERRIDE_EXPIRED, Severity::Warning, message)
                    .with_fix_hint("Fix the underlying violation or renew the override"),
            );
            if policy.fail_on_expired {
                continue;
            }
        }

        usable.push(ov);
    }

    result.active_overrides = usable.len();
    if usable.len() > policy.max_per_file {
        result.debt = Some(OverrideDebt {
            active: usable.len(),
            limit: policy.max_per_file,
        });
    }

    let file_intents: HashSet<String> = intents.iter().map(|i| normalize_intent(i)).collect();

    for violation in violations {
        let exempt = violation
            .intent_exemptions
            .iter()
            .any(|i| file_intents.contains(&normalize_intent(i)));
        if exempt {
            result.exempted_count += 1;
            continue;
        }

        if usable.iter().any(|ov| ov.targets(&violation)) {
            result.overridden_count += 1;
            continue;
        }

        result.kept.push(violation);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn lodash_violation() -> Violation {
        Violation::new(
            "forbid_import",
            "forbid_import:lodash",
            Severity::Error,
            "Import of 'lodash' is forbidden",
        )
    }

    #[test]
    fn override_without_expiry_suppresses() {
        let overrides = vec![Override::new("forbid_import:lodash", "temporary")];
        let r = reconcile(vec![lodash_violation()], &overrides, &[], &OverridePolicy::new(today()));
        assert!(r.kept.is_empty());
        assert_eq!(r.overridden_count, 1);
        assert!(r.notes.is_empty());
    }

    #[test]
    fn override_by_bare_rule_name_suppresses() {
        let overrides = vec![Override::new("forbid_import", "legacy module")];
        let r = reconcile(vec![lodash_violation()], &overrides, &[], &OverridePolicy::new(today()));
        assert_eq!(r.overridden_count, 1);
    }

    #[test]
    fn override_for_other_key_does_not_suppress() {
        let overrides = vec![Override::new("forbid_import:axios", "temporary")];
        let r = reconcile(vec![lodash_violation()], &overrides, &[], &OverridePolicy::new(today()));
        assert_eq!(r.kept.len(), 1);
        assert_eq!(r.overridden_count, 0);
    }

    #[test]
    fn override_can_target_one_list_entry() {
        let v = |entry: &str| {
            Violation::new(
                "forbid_import",
                "forbid_import:axios,lodash",
                Severity::Error,
                format!("Import of '{entry}' is forbidden"),
            )
            .with_entry(entry)
        };
        let overrides = vec![Override::new("forbid_import:lodash", "temporary")];
        let r = reconcile(
            vec![v("axios"), v("lodash")],
            &overrides,
            &[],
            &OverridePolicy::new(today()),
        );
        assert_eq!(r.overridden_count, 1);
        assert_eq!(r.kept.len(), 1);
        assert_eq!(r.kept[0].entry.as_deref(), Some("axios"));
    }

    #[test]
    fn entry_target_requires_same_rule() {
        let v = lodash_violation().with_entry("lodash");
        assert!(!Override::new("forbid_call:lodash", "x").targets(&v));
        assert!(!Override::new("forbid_importlodash", "x").targets(&v));
        assert!(Override::new("forbid_import: lodash", "x").targets(&v));
    }

    #[test]
    fn future_expiry_suppresses() {
        let ov = Override::new("forbid_import:lodash", "migrating")
            .expiring(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        let r = reconcile(vec![lodash_violation()], &[ov], &[], &OverridePolicy::new(today()));
        assert_eq!(r.overridden_count, 1);
    }

    #[test]
    fn expired_override_with_strict_policy_does_not_suppress() {
        let ov = Override::new("forbid_import:lodash", "migrating")
            .expiring(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let r = reconcile(vec![lodash_violation()], &[ov], &[], &OverridePolicy::new(today()));
        assert_eq!(r.kept.len(), 1);
        assert_eq!(r.overridden_count, 0);
        assert_eq!(r.notes[0].rule, synthetic::OVERRIDE_EXPIRED);
    }

    #[test]
    fn expired_override_with_lax_policy_still_suppresses() {
        let ov = Override::new("forbid_import:lodash", "migrating")
            .expiring(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let mut policy = OverridePolicy::new(today());
        policy.fail_on_expired = false;
        let r = reconcile(vec![lodash_violation()], &[ov], &[], &policy);
        assert!(r.kept.is_empty());
        assert_eq!(r.overridden_count, 1);
        assert_eq!(r.notes.len(), 1);
    }

    #[test]
    fn expiring_today_is_still_active() {
        let ov = Override::new("forbid_import:lodash", "last day").expiring(today());
        let r = reconcile(vec![lodash_violation()], &[ov], &[], &OverridePolicy::new(today()));
        assert_eq!(r.overridden_count, 1);
    }

    #[test]
    fn override_missing_reason_is_invalid() {
        let mut ov = Override::new("forbid_import:lodash", "");
        ov.reason = None;
        let r = reconcile(vec![lodash_violation()], &[ov], &[], &OverridePolicy::new(today()));
        assert_eq!(r.kept.len(), 1);
        assert_eq!(r.notes[0].rule, synthetic::OVERRIDE_INVALID);
        assert!(r.notes[0].message.contains("reason"));
    }

    #[test]
    fn configured_required_fields_are_enforced() {
        let mut policy = OverridePolicy::new(today());
        policy.required_fields = vec![OverrideField::Ticket];
        let ov = Override::new("forbid_import:lodash", "temporary");
        let r = reconcile(vec![lodash_violation()], &[ov], &[], &policy);
        assert_eq!(r.kept.len(), 1);
        assert!(r.notes[0].message.contains("ticket"));
    }

    #[test]
    fn intent_exemption_suppresses_without_counting() {
        let v = lodash_violation().with_intent_exemptions(vec!["legacy-bridge".into()]);
        let r = reconcile(
            vec![v],
            &[],
            &["@intent:legacy-bridge".to_string()],
            &OverridePolicy::new(today()),
        );
        assert!(r.kept.is_empty());
        assert_eq!(r.overridden_count, 0);
        assert_eq!(r.exempted_count, 1);
    }

    #[test]
    fn intent_exemption_requires_matching_intent() {
        let v = lodash_violation().with_intent_exemptions(vec!["legacy-bridge".into()]);
        let r = reconcile(vec![v], &[], &["admin".to_string()], &OverridePolicy::new(today()));
        assert_eq!(r.kept.len(), 1);
    }

    #[test]
    fn override_debt_flagged_above_limit() {
        let mut policy = OverridePolicy::new(today());
        policy.max_per_file = 1;
        let overrides = vec![
            Override::new("forbid_import", "a"),
            Override::new("forbid_call", "b"),
        ];
        let r = reconcile(vec![], &overrides, &[], &policy);
        assert_eq!(r.active_overrides, 2);
        assert_eq!(r.debt, Some(OverrideDebt { active: 2, limit: 1 }));
    }
}
