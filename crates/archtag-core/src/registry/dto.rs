//! YAML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::model::ConstraintValue;

/// Raw YAML representation of a registry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryDto {
    /// Architectures keyed by id.
    #[serde(default)]
    pub architectures: BTreeMap<String, ArchitectureDto>,

    /// Mixins keyed by id.
    #[serde(default)]
    pub mixins: BTreeMap<String, MixinDto>,
}

/// YAML representation of an architecture.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchitectureDto {
    /// Parent architecture id.
    #[serde(default)]
    pub inherits: Option<String>,
    /// Mixin ids, in application order.
    #[serde(default)]
    pub mixins: Vec<String>,
    /// Local constraints.
    #[serde(default)]
    pub constraints: Vec<ConstraintDto>,
    /// Local hints.
    #[serde(default)]
    pub hints: Vec<HintDto>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Singleton flag.
    #[serde(default)]
    pub singleton: bool,
}

/// YAML representation of a mixin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MixinDto {
    /// Constraints contributed.
    #[serde(default)]
    pub constraints: Vec<ConstraintDto>,
    /// Hints contributed.
    #[serde(default)]
    pub hints: Vec<HintDto>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A hint: plain text, or text with an example.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HintDto {
    /// `- "Keep handlers thin"`
    Text(String),
    /// `- { text: "...", example: "..." }`
    Detailed {
        /// Hint text.
        text: String,
        /// Optional example reference.
        #[serde(default)]
        example: Option<String>,
    },
}

impl HintDto {
    /// Flattens the hint to a single line of text.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Detailed {
                text,
                example: Some(example),
            } => format!("{text} (see {example})"),
            Self::Detailed {
                text,
                example: None,
            } => text,
        }
    }
}

/// YAML representation of a constraint.
#[derive(Debug, Clone, Deserialize)]
pub struct ConstraintDto {
    /// Rule name (validated against the catalog by the loader).
    pub rule: String,
    /// Rule value.
    pub value: ConstraintValue,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
    /// Rationale.
    #[serde(default)]
    pub why: Option<String>,
    /// Single alternative.
    #[serde(default)]
    pub alternative: Option<String>,
    /// Several alternatives.
    #[serde(default)]
    pub alternatives: Vec<String>,
    /// Exemption conditions.
    #[serde(default)]
    pub unless: Vec<String>,
    /// "all" or "any".
    #[serde(default, rename = "match")]
    pub match_mode: Option<String>,
    /// Refining regex.
    #[serde(default)]
    pub pattern: Option<String>,
}

fn default_severity_str() -> String {
    "error".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_empty() {
        let dto: RegistryDto = serde_yaml::from_str("{}").unwrap();
        assert!(dto.architectures.is_empty());
        assert!(dto.mixins.is_empty());
    }

    #[test]
    fn deserialize_full_registry() {
        let yaml = r#"
architectures:
  base:
    description: Shared baseline
    constraints:
      - rule: forbid_import
        value: [axios, request]
        why: Use the shared HTTP client
        alternative: src/http
    hints:
      - Keep modules small
      - text: Prefer pure functions
        example: src/utils/math.ts
  app.service:
    inherits: base
    mixins: [tested]
    singleton: true
    constraints:
      - rule: max_file_lines
        value: 300
        severity: warning
mixins:
  tested:
    constraints:
      - rule: require_import
        value: vitest
        match: any
"#;
        let dto: RegistryDto = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(dto.architectures.len(), 2);

        let base = &dto.architectures["base"];
        assert_eq!(base.constraints[0].severity, "error");
        assert_eq!(
            base.constraints[0].value,
            ConstraintValue::List(vec!["axios".into(), "request".into()])
        );
        assert_eq!(base.hints.len(), 2);

        let service = &dto.architectures["app.service"];
        assert_eq!(service.inherits.as_deref(), Some("base"));
        assert!(service.singleton);
        assert_eq!(service.constraints[0].value, ConstraintValue::Number(300));

        let tested = &dto.mixins["tested"];
        assert_eq!(tested.constraints[0].match_mode.as_deref(), Some("any"));
    }

    #[test]
    fn detailed_hint_flattens_with_example() {
        let hint = HintDto::Detailed {
            text: "Prefer pure functions".into(),
            example: Some("src/math.ts".into()),
        };
        assert_eq!(hint.into_text(), "Prefer pure functions (see src/math.ts)");
    }
}
