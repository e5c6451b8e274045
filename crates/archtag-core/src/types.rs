//! Core types for constraint violations and validation results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for a constraint.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning that should be addressed; never fails a file on its own.
    Warning,
    /// Error that must be fixed.
    #[default]
    Error,
}

impl Severity {
    /// Parses a severity name (`error` or `warning`).
    #[must_use]
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path as supplied by the caller.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }

    /// Creates a location pointing at the start of a line.
    #[must_use]
    pub fn at_line(file: PathBuf, line: usize) -> Self {
        Self::new(file, line, 1)
    }
}

/// What a structured suggestion asks the developer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionAction {
    /// Replace the target with the replacement.
    Replace,
    /// Remove the target.
    Remove,
    /// Add the target (for example a missing import).
    Add,
    /// Rename the target.
    Rename,
}

/// A structured fix suggestion for a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Kind of change.
    pub action: SuggestionAction,
    /// What the change applies to (module, call, export name...).
    pub target: String,
    /// Replacement value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    /// Ready-to-paste import statement, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_statement: Option<String>,
}

impl Suggestion {
    /// Creates a suggestion without replacement or import statement.
    #[must_use]
    pub fn new(action: SuggestionAction, target: impl Into<String>) -> Self {
        Self {
            action,
            target: target.into(),
            replacement: None,
            import_statement: None,
        }
    }

    /// Creates a `replace` suggestion.
    #[must_use]
    pub fn replace(target: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            replacement: Some(replacement.into()),
            ..Self::new(SuggestionAction::Replace, target)
        }
    }

    /// Sets the import statement.
    #[must_use]
    pub fn with_import_statement(mut self, statement: impl Into<String>) -> Self {
        self.import_statement = Some(statement.into());
        self
    }

    /// One-line human rendering.
    #[must_use]
    pub fn describe(&self) -> String {
        match (&self.action, &self.replacement, &self.import_statement) {
            (_, _, Some(statement)) => format!("add `{statement}`"),
            (SuggestionAction::Replace | SuggestionAction::Rename, Some(r), None) => {
                format!("replace `{}` with `{r}`", self.target)
            }
            (SuggestionAction::Remove, _, None) => format!("remove `{}`", self.target),
            _ => format!("add `{}`", self.target),
        }
    }
}

/// A pointer to the canonical implementation the developer probably wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidYouMean {
    /// Canonical file path.
    pub file: String,
    /// Export to use from that file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<String>,
    /// Short usage description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Rule ids for findings that do not come from a declared constraint.
pub mod synthetic {
    /// File has no architecture tag.
    pub const UNTAGGED: &str = "untagged";
    /// File tag names an architecture absent from the registry.
    pub const UNKNOWN_ARCHITECTURE: &str = "unknown_architecture";
    /// The file or its semantic model could not be obtained.
    pub const SOURCE_UNAVAILABLE: &str = "source_unavailable";
    /// A violated constraint declares no rationale.
    pub const MISSING_WHY: &str = "missing_why";
    /// An override lacks required fields.
    pub const OVERRIDE_INVALID: &str = "override_invalid";
    /// An override is past its expiry date.
    pub const OVERRIDE_EXPIRED: &str = "override_expired";
}

/// A constraint violation (or warning) found during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule id (e.g. `forbid_import`, or a [`synthetic`] id).
    pub rule: String,
    /// Constraint key (`rule:normalized-value`); overrides target this.
    pub key: String,
    /// The list entry at fault (`lodash` in `forbid_import:axios,lodash`),
    /// when the finding concerns one entry of the constraint's value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    /// Severity of this finding.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Where the problem is, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Free-text fix hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_hint: Option<String>,
    /// Structured suggestion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
    /// Canonical-pattern hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did_you_mean: Option<DidYouMean>,
    /// Rationale copied from the constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    /// Architecture or mixin that contributed the constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Intents that exempt a file from this finding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intent_exemptions: Vec<String>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        key: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            key: key.into(),
            entry: None,
            severity,
            message: message.into(),
            location: None,
            fix_hint: None,
            suggestion: None,
            did_you_mean: None,
            why: None,
            source: None,
            intent_exemptions: Vec::new(),
        }
    }

    /// Creates a finding for a [`synthetic`] rule id; key and rule coincide.
    #[must_use]
    pub fn synthetic(rule: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self::new(rule, rule, severity, message)
    }

    /// Sets the offending list entry.
    #[must_use]
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into().trim().to_string());
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Sets the structured suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Sets the did-you-mean hint.
    #[must_use]
    pub fn with_did_you_mean(mut self, hint: DidYouMean) -> Self {
        self.did_you_mean = Some(hint);
        self
    }

    /// Sets the rationale.
    #[must_use]
    pub fn with_why(mut self, why: Option<String>) -> Self {
        self.why = why;
        self
    }

    /// Sets the provenance.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the intent exemptions.
    #[must_use]
    pub fn with_intent_exemptions(mut self, intents: Vec<String>) -> Self {
        self.intent_exemptions = intents;
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = match &self.location {
            Some(loc) => format!(
                "{} at {}:{}:{}\n",
                self.key,
                loc.file.display(),
                loc.line,
                loc.column
            ),
            None => format!("{}\n", self.key),
        };
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(why) = &self.why {
            let _ = writeln!(output, "  = why: {why}");
        }
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.describe());
        } else if let Some(hint) = &self.fix_hint {
            let _ = writeln!(output, "  = help: {hint}");
        }
        if let Some(dym) = &self.did_you_mean {
            match &dym.export {
                Some(export) => {
                    let _ = writeln!(output, "  = did you mean: {} from {}", export, dym.file);
                }
                None => {
                    let _ = writeln!(output, "  = did you mean: {}", dym.file);
                }
            }
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{}:{}:{}: ", loc.file.display(), loc.line, loc.column)?;
        }
        write!(f, "{} [{}] {}", self.severity, self.key, self.message)
    }
}

/// Terminal state of one file's validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// No surviving findings.
    Pass,
    /// Only warnings survived.
    Warn,
    /// At least one error-severity violation survived.
    Fail,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Warn => write!(f, "warn"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Raised when a file carries more active overrides than allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideDebt {
    /// Active overrides on the file.
    pub active: usize,
    /// Configured limit.
    pub limit: usize,
}

/// Outcome of validating one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// File path.
    pub file: PathBuf,
    /// Resolved architecture id, or `None` for untagged files.
    pub arch_id: Option<String>,
    /// Aggregated status.
    pub status: FileStatus,
    /// Surviving error-severity violations.
    pub violations: Vec<Violation>,
    /// Surviving warnings.
    pub warnings: Vec<Violation>,
    /// Violations suppressed by a valid override.
    pub overridden_count: usize,
    /// Set when the file exceeds the override limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_debt: Option<OverrideDebt>,
}

impl ValidationResult {
    /// Builds a result from surviving findings, splitting them by severity
    /// and deriving the status.
    #[must_use]
    pub fn from_findings(
        file: PathBuf,
        arch_id: Option<String>,
        findings: Vec<Violation>,
        overridden_count: usize,
    ) -> Self {
        let (violations, warnings): (Vec<_>, Vec<_>) = findings
            .into_iter()
            .partition(|v| v.severity == Severity::Error);
        let status = if !violations.is_empty() {
            FileStatus::Fail
        } else if !warnings.is_empty() {
            FileStatus::Warn
        } else {
            FileStatus::Pass
        };
        Self {
            file,
            arch_id,
            status,
            violations,
            warnings,
            overridden_count,
            override_debt: None,
        }
    }

    /// Builds a failing result carrying a single synthetic violation.
    #[must_use]
    pub fn failed(file: PathBuf, arch_id: Option<String>, violation: Violation) -> Self {
        Self::from_findings(file, arch_id, vec![violation], 0)
    }

    /// Attaches override-debt information.
    #[must_use]
    pub fn with_override_debt(mut self, debt: Option<OverrideDebt>) -> Self {
        self.override_debt = debt;
        self
    }

    /// Returns true if the file failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.status == FileStatus::Fail
    }

    /// Formats the result for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} [{}] {}\n",
            self.status,
            self.arch_id.as_deref().unwrap_or("untagged"),
            self.file.display()
        );
        for v in self.violations.iter().chain(&self.warnings) {
            for line in v.format().lines() {
                let _ = writeln!(output, "  {line}");
            }
        }
        if self.overridden_count > 0 {
            let _ = writeln!(output, "  ({} overridden)", self.overridden_count);
        }
        output
    }
}

/// Aggregate of a batch of validations.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Per-file results, in input order.
    pub results: Vec<ValidationResult>,
    /// Files that passed.
    pub passed: usize,
    /// Files that only warned.
    pub warned: usize,
    /// Files that failed.
    pub failed: usize,
    /// Total violations suppressed by overrides.
    pub overridden: usize,
    /// Files over the override limit.
    pub override_debt: Vec<PathBuf>,
}

impl BatchReport {
    /// Builds a report from per-file results.
    #[must_use]
    pub fn from_results(results: Vec<ValidationResult>) -> Self {
        let mut report = Self::default();
        for r in &results {
            match r.status {
                FileStatus::Pass => report.passed += 1,
                FileStatus::Warn => report.warned += 1,
                FileStatus::Fail => report.failed += 1,
            }
            report.overridden += r.overridden_count;
            if r.override_debt.is_some() {
                report.override_debt.push(r.file.clone());
            }
        }
        report.results = results;
        report
    }

    /// Returns true if any file failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// One-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} file(s): {} passed, {} warned, {} failed, {} overridden",
            self.results.len(),
            self.passed,
            self.warned,
            self.failed,
            self.overridden
        )
    }
}
