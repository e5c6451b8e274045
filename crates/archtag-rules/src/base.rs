//! Shared building blocks for validators.
//!
//! Every finding is stamped with the constraint's key, severity, rationale,
//! provenance and `@intent:` exemptions here, so individual validators only
//! decide *what* is wrong.

use archtag_core::{
    ResolvedConstraint, RuleKind, Suggestion, SuggestionAction, ValidationContext, ValueShape,
    Violation,
};
use regex::Regex;

/// Creates a violation for the constraint with its metadata attached.
pub(crate) fn violation(constraint: &ResolvedConstraint, message: impl Into<String>) -> Violation {
    let c = &constraint.constraint;
    Violation::new(c.rule.as_str(), &constraint.key, c.severity, message)
        .with_why(c.why.clone())
        .with_source(&constraint.source)
        .with_intent_exemptions(c.intent_exemptions())
}

/// A violation located at a line of the file (line 0 means unknown).
pub(crate) fn violation_at(
    constraint: &ResolvedConstraint,
    ctx: &ValidationContext<'_>,
    line: usize,
    message: impl Into<String>,
) -> Violation {
    let v = violation(constraint, message);
    if line == 0 {
        v
    } else {
        v.with_location(ctx.location(line))
    }
}

/// Reports a constraint whose data cannot be interpreted.
pub(crate) fn misconfigured(constraint: &ResolvedConstraint, problem: impl AsRef<str>) -> Violation {
    violation(
        constraint,
        format!(
            "Constraint `{}` (from {}) is misconfigured: {}",
            constraint.key,
            constraint.source,
            problem.as_ref()
        ),
    )
    .with_fix_hint("Fix the constraint in the architecture registry")
}

/// Reads a list value, or explains why it cannot.
pub(crate) fn expect_list(constraint: &ResolvedConstraint) -> Result<Vec<String>, Violation> {
    let value = &constraint.constraint.value;
    if !value.fits(ValueShape::TextOrList) {
        return Err(misconfigured(
            constraint,
            format!("expected a string or list of strings, got `{value}`"),
        ));
    }
    let items: Vec<String> = value
        .as_list()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        return Err(misconfigured(constraint, "value must not be empty"));
    }
    Ok(items)
}

/// Reads a single string value, or explains why it cannot.
pub(crate) fn expect_text(constraint: &ResolvedConstraint) -> Result<String, Violation> {
    match constraint.constraint.value.as_text().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(misconfigured(
            constraint,
            format!("expected a single string, got `{}`", constraint.constraint.value),
        )),
    }
}

/// Reads a non-negative limit, or explains why it cannot.
pub(crate) fn expect_limit(constraint: &ResolvedConstraint) -> Result<usize, Violation> {
    let value = &constraint.constraint.value;
    value
        .as_number()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            misconfigured(
                constraint,
                format!("expected a non-negative integer, got `{value}`"),
            )
        })
}

/// Compiles a regex, or explains why it cannot.
pub(crate) fn compile(constraint: &ResolvedConstraint, pattern: &str) -> Result<Regex, Violation> {
    Regex::new(pattern)
        .map_err(|e| misconfigured(constraint, format!("invalid regex `{pattern}`: {e}")))
}

/// Compiles the optional refining `pattern` field.
pub(crate) fn refining_pattern(
    constraint: &ResolvedConstraint,
) -> Result<Option<Regex>, Violation> {
    constraint
        .constraint
        .pattern
        .as_deref()
        .map(|p| compile(constraint, p))
        .transpose()
}

/// Attaches a replacement suggestion or a did-you-mean hint to a finding
/// from the forbid family.
///
/// Declared alternatives take priority; otherwise the canonical-pattern
/// table is consulted with the forbidden term.
pub(crate) fn with_replacement(
    violation: Violation,
    constraint: &ResolvedConstraint,
    ctx: &ValidationContext<'_>,
    term: &str,
) -> Violation {
    let alternatives = constraint.constraint.all_alternatives();
    if let Some(first) = alternatives.first() {
        let hint = if alternatives.len() == 1 {
            format!("Use `{first}` instead")
        } else {
            format!("Use one of: {}", alternatives.join(", "))
        };
        let mut suggestion = Suggestion::replace(term, *first);
        if constraint.constraint.rule == RuleKind::ForbidImport {
            suggestion = suggestion.with_import_statement(import_statement(ctx, first));
        }
        return violation.with_suggestion(suggestion).with_fix_hint(hint);
    }

    match ctx.patterns.and_then(|p| p.find_by_keyword(term)) {
        Some(hint) => violation.with_did_you_mean(hint),
        None => violation,
    }
}

/// A suggestion to add an import of `module`.
pub(crate) fn add_import(ctx: &ValidationContext<'_>, module: &str) -> Suggestion {
    Suggestion::new(SuggestionAction::Add, module)
        .with_import_statement(import_statement(ctx, module))
}

/// Renders an import statement in the file's language.
pub(crate) fn import_statement(ctx: &ValidationContext<'_>, module: &str) -> String {
    use archtag_core::Language;
    match ctx.language {
        Language::Python => format!("import {module}"),
        Language::Go => format!("import \"{module}\""),
        Language::Java => format!("import {module};"),
        Language::TypeScript | Language::JavaScript | Language::Other => {
            format!("import '{module}';")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{file, resolved};
    use archtag_core::{CanonicalPattern, Constraint, ConstraintValue, PatternRegistry, Severity};

    fn forbid_axios() -> Constraint {
        Constraint::new(RuleKind::ForbidImport, ConstraintValue::Text("axios".into()))
    }

    #[test]
    fn violation_carries_constraint_metadata() {
        let c = resolved(
            forbid_axios()
                .with_severity(Severity::Warning)
                .with_why("Use the shared client")
                .with_unless("@intent:http-adapter"),
        );
        let v = violation(&c, "nope");
        assert_eq!(v.rule, "forbid_import");
        assert_eq!(v.key, "forbid_import:axios");
        assert_eq!(v.severity, Severity::Warning);
        assert_eq!(v.why.as_deref(), Some("Use the shared client"));
        assert_eq!(v.source.as_deref(), Some("test"));
        assert_eq!(v.intent_exemptions, vec!["http-adapter"]);
    }

    #[test]
    fn wrong_shapes_are_misconfigurations() {
        let c = resolved(Constraint::new(
            RuleKind::ForbidImport,
            ConstraintValue::Number(3),
        ));
        let err = expect_list(&c).unwrap_err();
        assert!(err.message.contains("misconfigured"));

        let c = resolved(Constraint::new(
            RuleKind::MaxFileLines,
            ConstraintValue::Text("many".into()),
        ));
        assert!(expect_limit(&c).is_err());

        let c = resolved(Constraint::new(
            RuleKind::NamingPattern,
            ConstraintValue::List(vec!["a".into(), "b".into()]),
        ));
        assert!(expect_text(&c).is_err());
    }

    #[test]
    fn invalid_regex_is_misconfiguration() {
        let c = resolved(forbid_axios().with_pattern("(unclosed"));
        let err = refining_pattern(&c).unwrap_err();
        assert!(err.message.contains("invalid regex"));
    }

    #[test]
    fn alternatives_become_suggestions() {
        let c = resolved(forbid_axios().with_alternative("@/lib/http"));
        let f = file("src/a.ts");
        let ctx = ValidationContext::new(&f);
        let v = with_replacement(violation(&c, "x"), &c, &ctx, "axios");
        let s = v.suggestion.unwrap();
        assert_eq!(s.replacement.as_deref(), Some("@/lib/http"));
        assert_eq!(s.import_statement.as_deref(), Some("import '@/lib/http';"));
        assert!(v.did_you_mean.is_none());
    }

    #[test]
    fn pattern_table_supplies_did_you_mean() {
        let patterns = PatternRegistry::new().with_pattern(
            "http",
            CanonicalPattern {
                canonical: "src/lib/http.ts".into(),
                exports: vec!["httpClient".into()],
                usage: None,
                keywords: vec!["axios".into()],
            },
        );
        let c = resolved(forbid_axios());
        let f = file("src/a.ts");
        let ctx = ValidationContext::new(&f).with_patterns(Some(&patterns));
        let v = with_replacement(violation(&c, "x"), &c, &ctx, "axios");
        assert_eq!(v.did_you_mean.unwrap().file, "src/lib/http.ts");
        assert!(v.suggestion.is_none());
    }
}
