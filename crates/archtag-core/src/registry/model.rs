//! Pure domain model for architecture registries.
//!
//! Architectures and mixins are plain data: an id plus edges to other ids.
//! Nothing here walks the graph; see [`crate::resolver`] for that.

use crate::semantic::Language;
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

// ────────────────────────────────────────────
// Rule catalog
// ────────────────────────────────────────────

/// The closed set of constraint kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Listed modules must not be imported.
    ForbidImport,
    /// Listed modules must be imported (`match` = all | any).
    RequireImport,
    /// Listed exports must exist (exact, `*suffix`, `prefix*`, regex).
    RequireExport,
    /// Every exported class must carry the decorator.
    RequireDecorator,
    /// File name must match the regex.
    NamingPattern,
    /// File must not exceed the line count.
    MaxFileLines,
    /// File content must not match the regex.
    ForbidPattern,
    /// Listed callees must not be called.
    ForbidCall,
    /// File content must match the regex.
    RequirePattern,
    /// No class may carry the decorator.
    ForbidDecorator,
    /// Exported classes must not exceed the public method count.
    MaxPublicMethods,
}

/// The value shape each rule kind expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// A single string.
    Text,
    /// A string or a list of strings.
    TextOrList,
    /// An integer.
    Number,
}

impl RuleKind {
    /// Every rule kind, in catalog order.
    pub const ALL: [Self; 11] = [
        Self::ForbidImport,
        Self::RequireImport,
        Self::RequireExport,
        Self::RequireDecorator,
        Self::NamingPattern,
        Self::MaxFileLines,
        Self::ForbidPattern,
        Self::ForbidCall,
        Self::RequirePattern,
        Self::ForbidDecorator,
        Self::MaxPublicMethods,
    ];

    /// Returns the snake_case rule name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ForbidImport => "forbid_import",
            Self::RequireImport => "require_import",
            Self::RequireExport => "require_export",
            Self::RequireDecorator => "require_decorator",
            Self::NamingPattern => "naming_pattern",
            Self::MaxFileLines => "max_file_lines",
            Self::ForbidPattern => "forbid_pattern",
            Self::ForbidCall => "forbid_call",
            Self::RequirePattern => "require_pattern",
            Self::ForbidDecorator => "forbid_decorator",
            Self::MaxPublicMethods => "max_public_methods",
        }
    }

    /// Parses a rule name. Accepts kebab-case as an alias.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().replace('-', "_");
        Self::ALL.into_iter().find(|k| k.as_str() == normalized)
    }

    /// Returns a brief description of what this rule checks.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::ForbidImport => "Forbids importing the listed modules",
            Self::RequireImport => "Requires importing the listed modules",
            Self::RequireExport => "Requires the listed exports to exist",
            Self::RequireDecorator => "Requires a decorator on every exported class",
            Self::NamingPattern => "Requires the file name to match a pattern",
            Self::MaxFileLines => "Limits the number of lines in a file",
            Self::ForbidPattern => "Forbids content matching a pattern",
            Self::ForbidCall => "Forbids calling the listed functions",
            Self::RequirePattern => "Requires content matching a pattern",
            Self::ForbidDecorator => "Forbids a decorator on any class",
            Self::MaxPublicMethods => "Limits public methods on exported classes",
        }
    }

    /// Returns the value shape this rule expects.
    #[must_use]
    pub fn value_shape(self) -> ValueShape {
        match self {
            Self::MaxFileLines | Self::MaxPublicMethods => ValueShape::Number,
            Self::NamingPattern => ValueShape::Text,
            _ => ValueShape::TextOrList,
        }
    }

    /// Whether the rule applies to files of the given language.
    #[must_use]
    pub fn is_enabled_for(self, language: Language) -> bool {
        match self {
            Self::RequireDecorator | Self::ForbidDecorator => language.has_decorators(),
            _ => true,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────
// Constraint values
// ────────────────────────────────────────────

/// A constraint value: number, string, or string list depending on the rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintValue {
    /// An integer (limits).
    Number(i64),
    /// A single string.
    Text(String),
    /// A list of strings.
    List(Vec<String>),
}

impl ConstraintValue {
    /// Normalizes the value to a list of strings.
    #[must_use]
    pub fn as_list(&self) -> Vec<String> {
        match self {
            Self::Number(n) => vec![n.to_string()],
            Self::Text(s) => vec![s.clone()],
            Self::List(items) => items.clone(),
        }
    }

    /// Returns the value as a number, parsing strings when possible.
    #[must_use]
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::List(_) => None,
        }
    }

    /// Returns the value as a single string, if it is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(items) if items.len() == 1 => Some(&items[0]),
            _ => None,
        }
    }

    /// Canonical form used in constraint keys.
    ///
    /// List entries are trimmed, sorted and deduplicated so that
    /// `[b, a]` and `[a, b, a]` produce the same key.
    #[must_use]
    pub fn normalized(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
            Self::List(items) => {
                let mut entries: Vec<&str> = items.iter().map(|s| s.trim()).collect();
                entries.sort_unstable();
                entries.dedup();
                entries.join(",")
            }
        }
    }

    /// Whether the value fits the given shape.
    #[must_use]
    pub fn fits(&self, shape: ValueShape) -> bool {
        match shape {
            ValueShape::Number => self.as_number().is_some(),
            ValueShape::Text => self.as_text().is_some(),
            ValueShape::TextOrList => !matches!(self, Self::Number(_)),
        }
    }
}

impl fmt::Display for ConstraintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// How list-valued rules combine their entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every entry must be satisfied.
    #[default]
    All,
    /// At least one entry must be satisfied.
    Any,
}

/// Prefix marking an intent exemption inside `unless`.
pub const INTENT_PREFIX: &str = "@intent:";

/// Strips an optional `@intent:` prefix and surrounding whitespace.
#[must_use]
pub fn normalize_intent(intent: &str) -> String {
    let trimmed = intent.trim();
    trimmed
        .strip_prefix(INTENT_PREFIX)
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

// ────────────────────────────────────────────
// Domain entities
// ────────────────────────────────────────────

/// A declared constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Rule kind.
    pub rule: RuleKind,
    /// Rule value.
    pub value: ConstraintValue,
    /// Severity (default: error).
    #[serde(default)]
    pub severity: Severity,
    /// Rationale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    /// Single suggested replacement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative: Option<String>,
    /// Several suggested replacements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
    /// Exemption conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unless: Vec<String>,
    /// List combination mode.
    #[serde(default, rename = "match")]
    pub match_mode: MatchMode,
    /// Optional regex refining the match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl Constraint {
    /// Creates an error-severity constraint with no metadata.
    #[must_use]
    pub fn new(rule: RuleKind, value: ConstraintValue) -> Self {
        Self {
            rule,
            value,
            severity: Severity::Error,
            why: None,
            alternative: None,
            alternatives: Vec::new(),
            unless: Vec::new(),
            match_mode: MatchMode::All,
            pattern: None,
        }
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the rationale.
    #[must_use]
    pub fn with_why(mut self, why: impl Into<String>) -> Self {
        self.why = Some(why.into());
        self
    }

    /// Sets the single alternative.
    #[must_use]
    pub fn with_alternative(mut self, alternative: impl Into<String>) -> Self {
        self.alternative = Some(alternative.into());
        self
    }

    /// Adds an `unless` condition.
    #[must_use]
    pub fn with_unless(mut self, condition: impl Into<String>) -> Self {
        self.unless.push(condition.into());
        self
    }

    /// Sets the match mode.
    #[must_use]
    pub fn with_match(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Sets the refining regex.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Dedup key: `rule:normalized(value)`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.rule, self.value.normalized())
    }

    /// Intents named by `@intent:` entries in `unless`.
    #[must_use]
    pub fn intent_exemptions(&self) -> Vec<String> {
        self.unless
            .iter()
            .filter(|c| c.trim().starts_with(INTENT_PREFIX))
            .map(|c| normalize_intent(c))
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// `unless` entries that are not intent exemptions.
    pub fn structural_exemptions(&self) -> impl Iterator<Item = &str> {
        self.unless
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.starts_with(INTENT_PREFIX))
    }

    /// All suggested replacements, `alternative` first.
    #[must_use]
    pub fn all_alternatives(&self) -> Vec<&str> {
        self.alternative
            .iter()
            .chain(&self.alternatives)
            .map(String::as_str)
            .collect()
    }
}

/// A registry architecture declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureNode {
    /// Dotted hierarchical id.
    pub id: String,
    /// Parent architecture id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Mixins applied to this node, in order.
    #[serde(default)]
    pub mixins: Vec<String>,
    /// Locally declared constraints.
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    /// Locally declared hints.
    #[serde(default)]
    pub hints: Vec<String>,
    /// Human description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// At most one file should carry this id (checked downstream).
    #[serde(default)]
    pub singleton: bool,
}

impl ArchitectureNode {
    /// Creates a node with no parent, mixins, constraints or hints.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            mixins: Vec::new(),
            constraints: Vec::new(),
            hints: Vec::new(),
            description: None,
            singleton: false,
        }
    }

    /// Sets the parent.
    #[must_use]
    pub fn inherits(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Appends a mixin.
    #[must_use]
    pub fn mixin(mut self, mixin: impl Into<String>) -> Self {
        self.mixins.push(mixin.into());
        self
    }

    /// Appends a constraint.
    #[must_use]
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Appends a hint.
    #[must_use]
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

/// A reusable, non-inheriting bundle of constraints and hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mixin {
    /// Mixin id.
    pub id: String,
    /// Constraints contributed.
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    /// Hints contributed.
    #[serde(default)]
    pub hints: Vec<String>,
    /// Human description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Mixin {
    /// Creates an empty mixin.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            constraints: Vec::new(),
            hints: Vec::new(),
            description: None,
        }
    }

    /// Appends a constraint.
    #[must_use]
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Appends a hint.
    #[must_use]
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

// ────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────

/// Content fingerprint identifying a registry snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough for logs.
        f.write_str(self.0.get(..12).unwrap_or(&self.0))
    }
}

/// An immutable registry snapshot.
///
/// Two snapshots built from equal declarations share a fingerprint, so
/// caches keyed by it survive a reload that changed nothing.
#[derive(Debug, Clone)]
pub struct Registry {
    nodes: HashMap<String, ArchitectureNode>,
    mixins: HashMap<String, Mixin>,
    fingerprint: Fingerprint,
}

impl Registry {
    /// Creates a snapshot. Later duplicates of an id replace earlier ones.
    #[must_use]
    pub fn new(nodes: Vec<ArchitectureNode>, mixins: Vec<Mixin>) -> Self {
        let nodes: HashMap<String, ArchitectureNode> =
            nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
        let mixins: HashMap<String, Mixin> =
            mixins.into_iter().map(|m| (m.id.clone(), m)).collect();
        let fingerprint = compute_fingerprint(&nodes, &mixins);
        Self {
            nodes,
            mixins,
            fingerprint,
        }
    }

    /// Creates an empty snapshot.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Returns the snapshot identity.
    #[must_use]
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Looks up an architecture.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&ArchitectureNode> {
        self.nodes.get(id)
    }

    /// Looks up a mixin.
    #[must_use]
    pub fn mixin(&self, id: &str) -> Option<&Mixin> {
        self.mixins.get(id)
    }

    /// Returns true if the architecture exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Returns all architecture ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of architectures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no architectures are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of mixins.
    #[must_use]
    pub fn mixin_count(&self) -> usize {
        self.mixins.len()
    }
}

fn compute_fingerprint(
    nodes: &HashMap<String, ArchitectureNode>,
    mixins: &HashMap<String, Mixin>,
) -> Fingerprint {
    let mut hasher = Sha256::new();

    let mut node_ids: Vec<&String> = nodes.keys().collect();
    node_ids.sort_unstable();
    for id in node_ids {
        hasher.update(b"node\0");
        hasher.update(format!("{:?}", nodes[id]).as_bytes());
    }

    let mut mixin_ids: Vec<&String> = mixins.keys().collect();
    mixin_ids.sort_unstable();
    for id in mixin_ids {
        hasher.update(b"mixin\0");
        hasher.update(format!("{:?}", mixins[id]).as_bytes());
    }

    Fingerprint(format!("{:x}", hasher.finalize()))
}

// ────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> ConstraintValue {
        ConstraintValue::Text(s.to_string())
    }

    fn list(items: &[&str]) -> ConstraintValue {
        ConstraintValue::List(items.iter().map(ToString::to_string).collect())
    }

    // -- RuleKind --

    #[test]
    fn rule_kind_round_trips_names() {
        for kind in RuleKind::ALL {
            assert_eq!(RuleKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(
            RuleKind::from_name("forbid-import"),
            Some(RuleKind::ForbidImport)
        );
        assert_eq!(RuleKind::from_name("no_such_rule"), None);
    }

    #[test]
    fn decorator_rules_disabled_for_go() {
        assert!(!RuleKind::RequireDecorator.is_enabled_for(Language::Go));
        assert!(RuleKind::RequireDecorator.is_enabled_for(Language::TypeScript));
        assert!(RuleKind::ForbidImport.is_enabled_for(Language::Go));
    }

    // -- ConstraintValue --

    #[test]
    fn normalized_list_is_order_insensitive() {
        assert_eq!(list(&["b", "a"]).normalized(), list(&["a", "b", "a"]).normalized());
        assert_eq!(list(&[" a ", "b"]).normalized(), "a,b");
    }

    #[test]
    fn value_shapes() {
        assert!(ConstraintValue::Number(300).fits(ValueShape::Number));
        assert!(text("300").fits(ValueShape::Number));
        assert!(!text("many").fits(ValueShape::Number));
        assert!(!ConstraintValue::Number(1).fits(ValueShape::TextOrList));
        assert!(list(&["x"]).fits(ValueShape::Text));
        assert!(!list(&["x", "y"]).fits(ValueShape::Text));
    }

    // -- Constraint --

    #[test]
    fn constraint_key_uses_normalized_value() {
        let c = Constraint::new(RuleKind::ForbidImport, list(&["lodash", "axios"]));
        assert_eq!(c.key(), "forbid_import:axios,lodash");
    }

    #[test]
    fn intent_exemptions_are_extracted() {
        let c = Constraint::new(RuleKind::ForbidCall, text("eval"))
            .with_unless("@intent:sandboxed")
            .with_unless("import:vm2")
            .with_unless("@intent: ");
        assert_eq!(c.intent_exemptions(), vec!["sandboxed".to_string()]);
        assert_eq!(c.structural_exemptions().collect::<Vec<_>>(), vec!["import:vm2"]);
    }

    #[test]
    fn alternatives_put_single_first() {
        let mut c = Constraint::new(RuleKind::ForbidImport, text("axios")).with_alternative("ky");
        c.alternatives = vec!["fetch".into()];
        assert_eq!(c.all_alternatives(), vec!["ky", "fetch"]);
    }

    // -- Registry --

    #[test]
    fn equal_declarations_share_fingerprint() {
        let a = Registry::new(
            vec![ArchitectureNode::new("base"), ArchitectureNode::new("app").inherits("base")],
            vec![Mixin::new("tested")],
        );
        let b = Registry::new(
            vec![ArchitectureNode::new("app").inherits("base"), ArchitectureNode::new("base")],
            vec![Mixin::new("tested")],
        );
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn changed_declarations_change_fingerprint() {
        let a = Registry::new(vec![ArchitectureNode::new("base")], vec![]);
        let b = Registry::new(vec![ArchitectureNode::new("base").hint("keep it small")], vec![]);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn registry_lookups() {
        let registry = Registry::new(
            vec![ArchitectureNode::new("b"), ArchitectureNode::new("a")],
            vec![Mixin::new("m")],
        );
        assert_eq!(registry.ids(), vec!["a", "b"]);
        assert!(registry.contains("a"));
        assert!(registry.mixin("m").is_some());
        assert_eq!(registry.mixin_count(), 1);
        assert!(Registry::empty().is_empty());
    }
}
