//! DTO → Domain model conversion with validation.

use crate::types::Severity;

use super::dto::{ArchitectureDto, ConstraintDto, MixinDto, RegistryDto};
use super::model::{ArchitectureNode, Constraint, MatchMode, Mixin, Registry, RuleKind};

/// Errors during registry loading.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum LoadError {
    /// YAML deserialization failed.
    #[error("registry YAML parse error: {0}")]
    #[diagnostic(code(archtag::registry::yaml))]
    Yaml(#[from] serde_yaml::Error),

    /// An architecture or mixin id is empty.
    #[error("{context}: id must not be empty")]
    #[diagnostic(code(archtag::registry::empty_id))]
    EmptyId {
        /// Where the id was found.
        context: String,
    },

    /// A constraint names a rule outside the catalog.
    #[error("{context}: unknown rule `{rule}`")]
    #[diagnostic(
        code(archtag::registry::unknown_rule),
        help("run `archtag list-rules` to see the supported rules")
    )]
    UnknownRule {
        /// Where the constraint was declared.
        context: String,
        /// The unknown rule name.
        rule: String,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning")]
    #[diagnostic(code(archtag::registry::unknown_severity))]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Unknown match mode string.
    #[error("{context}: unknown match mode `{value}`, expected: all, any")]
    #[diagnostic(code(archtag::registry::unknown_match))]
    UnknownMatchMode {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },
}

/// Converts a `RegistryDto` to a validated `Registry`.
///
/// Only catalog-level problems are reported here. Dangling parents,
/// dangling mixins and cycles are resolution errors.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: RegistryDto) -> Result<Registry, LoadError> {
    let nodes = dto
        .architectures
        .into_iter()
        .map(|(id, arch)| convert_architecture(id, arch))
        .collect::<Result<Vec<_>, _>>()?;

    let mixins = dto
        .mixins
        .into_iter()
        .map(|(id, mixin)| convert_mixin(id, mixin))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Registry::new(nodes, mixins))
}

fn convert_architecture(id: String, dto: ArchitectureDto) -> Result<ArchitectureNode, LoadError> {
    let id = validate_id(id, "architectures")?;
    let context = format!("architecture '{id}'");
    let constraints = convert_constraints(dto.constraints, &context)?;

    Ok(ArchitectureNode {
        parent: dto.inherits.map(|p| p.trim().to_string()),
        mixins: dto.mixins.into_iter().map(|m| m.trim().to_string()).collect(),
        constraints,
        hints: dto.hints.into_iter().map(super::dto::HintDto::into_text).collect(),
        description: dto.description,
        singleton: dto.singleton,
        id,
    })
}

fn convert_mixin(id: String, dto: MixinDto) -> Result<Mixin, LoadError> {
    let id = validate_id(id, "mixins")?;
    let context = format!("mixin '{id}'");
    let constraints = convert_constraints(dto.constraints, &context)?;

    Ok(Mixin {
        constraints,
        hints: dto.hints.into_iter().map(super::dto::HintDto::into_text).collect(),
        description: dto.description,
        id,
    })
}

fn validate_id(id: String, section: &str) -> Result<String, LoadError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(LoadError::EmptyId {
            context: section.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn convert_constraints(
    dtos: Vec<ConstraintDto>,
    owner: &str,
) -> Result<Vec<Constraint>, LoadError> {
    dtos.into_iter()
        .enumerate()
        .map(|(i, c)| convert_constraint(c, &format!("{owner} constraints[{i}]")))
        .collect()
}

fn convert_constraint(dto: ConstraintDto, context: &str) -> Result<Constraint, LoadError> {
    let rule = RuleKind::from_name(&dto.rule).ok_or_else(|| LoadError::UnknownRule {
        context: context.to_string(),
        rule: dto.rule.clone(),
    })?;
    let severity = parse_severity(&dto.severity, context)?;
    let match_mode = match dto.match_mode.as_deref() {
        None | Some("all") => MatchMode::All,
        Some("any") => MatchMode::Any,
        Some(other) => {
            return Err(LoadError::UnknownMatchMode {
                context: context.to_string(),
                value: other.to_string(),
            })
        }
    };

    Ok(Constraint {
        rule,
        value: dto.value,
        severity,
        why: dto.why.filter(|w| !w.trim().is_empty()),
        alternative: dto.alternative,
        alternatives: dto.alternatives,
        unless: dto.unless,
        match_mode,
        pattern: dto.pattern,
    })
}

fn parse_severity(value: &str, context: &str) -> Result<Severity, LoadError> {
    Severity::from_name(value).ok_or_else(|| LoadError::UnknownSeverity {
        context: context.to_string(),
        value: value.to_string(),
    })
}
