//! Canonical-pattern table used for "did you mean" hints.
//!
//! ```yaml
//! patterns:
//!   http_client:
//!     canonical: src/lib/http.ts
//!     exports: [httpClient]
//!     usage: "import { httpClient } from '@/lib/http'"
//!     keywords: [axios, fetch, request]
//! ```

use crate::types::DidYouMean;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One canonical implementation that forbidden code should use instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPattern {
    /// File holding the canonical implementation.
    pub canonical: String,
    /// Exports to use.
    #[serde(default)]
    pub exports: Vec<String>,
    /// How to use it.
    #[serde(default)]
    pub usage: Option<String>,
    /// Terms that point at this pattern.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CanonicalPattern {
    fn hint(&self) -> DidYouMean {
        DidYouMean {
            file: self.canonical.clone(),
            export: self.exports.first().cloned(),
            description: self.usage.clone(),
        }
    }
}

/// Named canonical patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRegistry {
    /// Patterns by name.
    #[serde(default)]
    pub patterns: BTreeMap<String, CanonicalPattern>,
}

impl PatternRegistry {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a table from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Adds a pattern, builder-style.
    #[must_use]
    pub fn with_pattern(mut self, name: impl Into<String>, pattern: CanonicalPattern) -> Self {
        self.patterns.insert(name.into(), pattern);
        self
    }

    /// Finds the first pattern (by name order) whose keyword matches the
    /// forbidden term, case-insensitively.
    #[must_use]
    pub fn find_by_keyword(&self, term: &str) -> Option<DidYouMean> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return None;
        }
        self.patterns
            .values()
            .find(|p| {
                p.keywords.iter().any(|k| {
                    let k = k.trim().to_lowercase();
                    !k.is_empty() && (term == k || term.contains(&k))
                })
            })
            .map(CanonicalPattern::hint)
    }

    /// Number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if there are no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
patterns:
  http_client:
    canonical: src/lib/http.ts
    exports: [httpClient]
    usage: "import { httpClient } from '@/lib/http'"
    keywords: [axios, request]
  logger:
    canonical: src/lib/logger.ts
    keywords: [console]
"#;

    #[test]
    fn parses_yaml() {
        let registry = PatternRegistry::from_yaml(YAML).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.patterns["logger"].exports.len(), 0);
    }

    #[test]
    fn finds_by_keyword() {
        let registry = PatternRegistry::from_yaml(YAML).unwrap();
        let hint = registry.find_by_keyword("Axios").unwrap();
        assert_eq!(hint.file, "src/lib/http.ts");
        assert_eq!(hint.export.as_deref(), Some("httpClient"));

        let hint = registry.find_by_keyword("console.log").unwrap();
        assert_eq!(hint.file, "src/lib/logger.ts");

        assert!(registry.find_by_keyword("lodash").is_none());
        assert!(registry.find_by_keyword("").is_none());
    }
}
