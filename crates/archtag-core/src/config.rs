//! Configuration types for archtag.

use crate::overrides::{OverrideField, OverridePolicy};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upper bound for `validation.concurrency`.
pub const MAX_CONCURRENCY: usize = 64;

/// Top-level configuration for archtag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Validation engine settings.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Override annotation settings.
    #[serde(default)]
    pub overrides: OverridesConfig,

    /// File selection settings.
    #[serde(default)]
    pub files: FilesConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks value ranges and field consistency.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(n) = self.validation.concurrency {
            if n == 0 || n > MAX_CONCURRENCY {
                return Err(ConfigError::invalid(
                    "validation.concurrency",
                    format!("must be between 1 and {MAX_CONCURRENCY}, got {n}"),
                ));
            }
        }

        if self.validation.max_overrides_per_file == 0 {
            return Err(ConfigError::invalid(
                "validation.max_overrides_per_file",
                "must be at least 1",
            ));
        }

        if let Some(field) = self
            .overrides
            .required_fields
            .iter()
            .find(|f| self.overrides.optional_fields.contains(f))
        {
            return Err(ConfigError::invalid(
                "overrides.optional_fields",
                format!("`{field}` is also listed in required_fields"),
            ));
        }

        if self
            .overrides
            .optional_fields
            .contains(&OverrideField::Reason)
        {
            return Err(ConfigError::invalid(
                "overrides.optional_fields",
                "`reason` is always required",
            ));
        }

        Ok(())
    }

    /// Builds the override policy for a validation run.
    #[must_use]
    pub fn override_policy(&self, today: NaiveDate) -> OverridePolicy {
        let mut policy = OverridePolicy::new(today);
        policy.required_fields = self.overrides.required_fields.clone();
        policy.fail_on_expired = self.validation.fail_on_expired_override;
        policy.max_per_file = self.validation.max_overrides_per_file;
        policy
    }
}

/// Validation engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Worker count (default: derived from CPU count).
    #[serde(default)]
    pub concurrency: Option<usize>,

    /// Whether an expired override stops suppressing its violation.
    #[serde(default = "default_true")]
    pub fail_on_expired_override: bool,

    /// What to do when a violated constraint has no `why`.
    #[serde(default)]
    pub missing_why: MissingWhyPolicy,

    /// Active overrides allowed per file before it is flagged.
    #[serde(default = "default_max_overrides")]
    pub max_overrides_per_file: usize,

    /// Whether to cache validation results by content hash.
    #[serde(default = "default_true")]
    pub cache: bool,
}

impl ValidationConfig {
    /// The configured worker count, or the CPU-derived default.
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.unwrap_or_else(default_concurrency)
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            concurrency: None,
            fail_on_expired_override: true,
            missing_why: MissingWhyPolicy::default(),
            max_overrides_per_file: default_max_overrides(),
            cache: true,
        }
    }
}

/// 75% of available cores, clamped to [2, 16].
#[must_use]
pub fn default_concurrency() -> usize {
    let cores = std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get);
    (cores * 3 / 4).clamp(2, 16)
}

fn default_true() -> bool {
    true
}

fn default_max_overrides() -> usize {
    20
}

/// Behavior for violated constraints that lack a `why`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingWhyPolicy {
    /// Do nothing.
    #[default]
    Ignore,
    /// Add a warning per constraint.
    Warning,
    /// Add an error per constraint.
    Error,
}

/// Override annotation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverridesConfig {
    /// Fields every override must carry.
    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<OverrideField>,

    /// Fields an override may carry.
    #[serde(default = "default_optional_fields")]
    pub optional_fields: Vec<OverrideField>,
}

impl Default for OverridesConfig {
    fn default() -> Self {
        Self {
            required_fields: default_required_fields(),
            optional_fields: default_optional_fields(),
        }
    }
}

fn default_required_fields() -> Vec<OverrideField> {
    vec![OverrideField::Reason]
}

fn default_optional_fields() -> Vec<OverrideField> {
    vec![
        OverrideField::Expires,
        OverrideField::Ticket,
        OverrideField::ApprovedBy,
    ]
}

/// File selection configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Handling of files without an `@arch` tag.
    #[serde(default)]
    pub untagged: UntaggedConfig,
}

/// Untagged file handling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UntaggedConfig {
    /// The policy to apply.
    #[serde(default)]
    pub policy: UntaggedPolicy,
}

/// What to do with a file that has no architecture tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UntaggedPolicy {
    /// No constraints, pass.
    #[default]
    Allow,
    /// Pass with a warning.
    Warn,
    /// Fail.
    Deny,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A setting is out of range or inconsistent.
    #[error("Invalid config value for {field}: {message}")]
    Invalid {
        /// Dotted setting name.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
