//! Architecture resolution: flattens inheritance and mixins into one
//! conflict-free constraint set.
//!
//! # Precedence
//!
//! The chain is walked root-first. At each level the node's mixins are
//! applied in declaration order, then the node's own constraints. Every
//! constraint is upserted by key (`rule:normalized(value)`), so later
//! entries replace earlier ones with the same key and entries with new keys
//! accumulate. A mixin listed again further down the chain is applied
//! again at that level, so it overrides the ancestors' local entries.

use crate::registry::model::{ArchitectureNode, Constraint, Fingerprint, Registry};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A constraint with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConstraint {
    /// The winning declaration.
    #[serde(flatten)]
    pub constraint: Constraint,
    /// Architecture or mixin id that contributed it.
    pub source: String,
    /// Dedup key.
    pub key: String,
}

/// The flattened result of resolving one architecture id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedArchitecture {
    /// The resolved id.
    pub arch_id: String,
    /// Description of the target node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Constraints in first-appearance order, one per key.
    pub constraints: Vec<ResolvedConstraint>,
    /// Hints, deduplicated, in first-appearance order.
    pub hints: Vec<String>,
    /// Mixins applied, in application order.
    pub applied_mixins: Vec<String>,
    /// Inheritance chain, root first.
    pub chain: Vec<String>,
    /// Whether the target is a singleton.
    pub singleton: bool,
    /// Identity of this rule set (registry snapshot + id).
    pub ruleset: String,
}

impl ResolvedArchitecture {
    /// Looks up a constraint by key.
    #[must_use]
    pub fn constraint(&self, key: &str) -> Option<&ResolvedConstraint> {
        self.constraints.iter().find(|c| c.key == key)
    }

    /// Number of constraints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns true if there are no constraints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

/// Errors resolving an architecture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum ResolveError {
    /// The requested id is not in the registry.
    #[error("unknown architecture `{id}`")]
    #[diagnostic(
        code(archtag::resolve::unknown_architecture),
        help("check the @arch tag against `archtag resolve` or the registry ids")
    )]
    UnknownArchitecture {
        /// The requested id.
        id: String,
    },

    /// A node inherits from an id that is not in the registry.
    #[error("architecture `{child}` inherits from unknown architecture `{parent}`")]
    #[diagnostic(code(archtag::resolve::unknown_parent))]
    UnknownParent {
        /// The inheriting node.
        child: String,
        /// The missing parent.
        parent: String,
    },

    /// A node references a mixin that is not in the registry.
    #[error("architecture `{arch}` references unknown mixin `{mixin}`")]
    #[diagnostic(code(archtag::resolve::unknown_mixin))]
    UnknownMixin {
        /// The referencing node.
        arch: String,
        /// The missing mixin.
        mixin: String,
    },

    /// Parent links form a cycle.
    #[error("circular inheritance: {}", chain.join(" -> "))]
    #[diagnostic(
        code(archtag::resolve::circular_inheritance),
        help("remove one of the `inherits` links in the cycle")
    )]
    CircularInheritance {
        /// The walk from the requested id back to the repeated node.
        chain: Vec<String>,
    },
}

type CacheKey = (Fingerprint, String);

/// Memoizing resolver.
///
/// Results are cached by (registry fingerprint, architecture id). A new
/// registry snapshot has a new fingerprint, so stale entries are never
/// returned for it.
#[derive(Debug, Default)]
pub struct Resolver {
    cache: DashMap<CacheKey, Arc<ResolvedArchitecture>>,
    resolutions: AtomicUsize,
}

impl Resolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves an architecture id against a registry snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the id, a parent or a mixin is missing, or if
    /// the parent links form a cycle.
    pub fn resolve(
        &self,
        registry: &Registry,
        arch_id: &str,
    ) -> Result<Arc<ResolvedArchitecture>, ResolveError> {
        let key = (registry.fingerprint().clone(), arch_id.to_string());
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(arch_id, "resolution cache hit");
            return Ok(Arc::clone(hit.value()));
        }

        // The entry lock is held while flattening; racing misses on the same
        // key wait here and take the stored value.
        match self.cache.entry(key) {
            Entry::Occupied(hit) => Ok(Arc::clone(hit.get())),
            Entry::Vacant(slot) => {
                let resolved = Arc::new(flatten(registry, arch_id)?);
                self.resolutions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    arch_id,
                    constraints = resolved.constraints.len(),
                    mixins = resolved.applied_mixins.len(),
                    "resolved architecture"
                );
                slot.insert(Arc::clone(&resolved));
                Ok(resolved)
            }
        }
    }

    /// Number of resolutions actually computed (cache misses).
    #[must_use]
    pub fn resolution_count(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }

    /// Number of cached results.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Drops every cached result.
    pub fn clear(&self) {
        self.cache.clear();
    }
}

/// Computes the identity of a resolved rule set.
#[must_use]
pub fn ruleset_id(fingerprint: &Fingerprint, arch_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(fingerprint.as_str().as_bytes());
    hasher.update([0]);
    hasher.update(arch_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn flatten(registry: &Registry, arch_id: &str) -> Result<ResolvedArchitecture, ResolveError> {
    let chain = ancestry(registry, arch_id)?;
    let mut acc = Accumulator::default();
    let mut applied_mixins: Vec<String> = Vec::new();

    for node in &chain {
        for mixin_id in &node.mixins {
            let mixin = registry
                .mixin(mixin_id)
                .ok_or_else(|| ResolveError::UnknownMixin {
                    arch: node.id.clone(),
                    mixin: mixin_id.clone(),
                })?;
            for constraint in &mixin.constraints {
                acc.upsert(constraint, &mixin.id);
            }
            acc.hints(&mixin.hints);
            if !applied_mixins.contains(&mixin.id) {
                applied_mixins.push(mixin.id.clone());
            }
        }

        for constraint in &node.constraints {
            acc.upsert(constraint, &node.id);
        }
        acc.hints(&node.hints);
    }

    let target = chain.last().copied();
    Ok(ResolvedArchitecture {
        arch_id: arch_id.to_string(),
        description: target.and_then(|n| n.description.clone()),
        constraints: acc.constraints,
        hints: acc.hint_list,
        applied_mixins,
        chain: chain.iter().map(|n| n.id.clone()).collect(),
        singleton: target.is_some_and(|n| n.singleton),
        ruleset: ruleset_id(registry.fingerprint(), arch_id),
    })
}

/// Walks parent links and returns the chain root first.
fn ancestry<'r>(
    registry: &'r Registry,
    arch_id: &str,
) -> Result<Vec<&'r ArchitectureNode>, ResolveError> {
    let mut node = registry
        .node(arch_id)
        .ok_or_else(|| ResolveError::UnknownArchitecture {
            id: arch_id.to_string(),
        })?;
    let mut chain = vec![node];
    let mut seen: HashSet<&str> = HashSet::from([node.id.as_str()]);

    while let Some(parent_id) = node.parent.as_deref() {
        if seen.contains(parent_id) {
            let mut cycle: Vec<String> = chain.iter().map(|n| n.id.clone()).collect();
            cycle.push(parent_id.to_string());
            return Err(ResolveError::CircularInheritance { chain: cycle });
        }
        let parent = registry
            .node(parent_id)
            .ok_or_else(|| ResolveError::UnknownParent {
                child: node.id.clone(),
                parent: parent_id.to_string(),
            })?;
        seen.insert(parent.id.as_str());
        chain.push(parent);
        node = parent;
    }

    chain.reverse();
    Ok(chain)
}

#[derive(Default)]
struct Accumulator {
    constraints: Vec<ResolvedConstraint>,
    index: HashMap<String, usize>,
    hint_list: Vec<String>,
    hint_seen: HashSet<String>,
}

impl Accumulator {
    fn upsert(&mut self, constraint: &Constraint, source: &str) {
        let key = constraint.key();
        let mut resolved = ResolvedConstraint {
            constraint: constraint.clone(),
            source: source.to_string(),
            key: key.clone(),
        };

        if let Some(&i) = self.index.get(&key) {
            // A redeclaration without rationale keeps the inherited one.
            if resolved.constraint.why.is_none() {
                resolved.constraint.why = self.constraints[i].constraint.why.take();
            }
            self.constraints[i] = resolved;
        } else {
            self.index.insert(key, self.constraints.len());
            self.constraints.push(resolved);
        }
    }

    fn hints(&mut self, hints: &[String]) {
        for hint in hints {
            let text = hint.trim();
            if !text.is_empty() && self.hint_seen.insert(text.to_string()) {
                self.hint_list.push(text.to_string());
            }
        }
    }
}
