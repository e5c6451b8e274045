//! Concurrent validation of tagged files.

use archtag_core::{
    reconcile, synthetic, BatchReport, Config, ConfigError, MissingWhyPolicy, OverridePolicy,
    PatternRegistry, Registry, ResolveError, ResolvedArchitecture, Resolver, Severity,
    SourceFile, SourceProvider, UntaggedPolicy, ValidationContext, ValidationResult, Violation,
};
use archtag_rules::ValidatorRegistry;
use chrono::NaiveDate;
use dashmap::DashMap;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a whole validation call.
///
/// Per-file problems (unreadable source, unknown tag) never surface here;
/// they become a failed [`ValidationResult`] for that file.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The registry topology is broken (unknown parent or mixin, cycle).
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// The worker pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// No source provider was configured.
    #[error("No source provider configured")]
    MissingSource,
}

/// Builder for configuring a [`ValidationEngine`].
#[derive(Default)]
pub struct EngineBuilder {
    config: Option<Config>,
    registry: Option<Arc<Registry>>,
    source: Option<Arc<dyn SourceProvider>>,
    patterns: Option<PatternRegistry>,
    validators: Option<ValidatorRegistry>,
    today: Option<NaiveDate>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the architecture registry snapshot.
    #[must_use]
    pub fn registry(mut self, registry: impl Into<Arc<Registry>>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Sets the provider that loads file inputs.
    #[must_use]
    pub fn source(mut self, source: Arc<dyn SourceProvider>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the canonical patterns used for did-you-mean hints.
    #[must_use]
    pub fn patterns(mut self, patterns: PatternRegistry) -> Self {
        self.patterns = Some(patterns);
        self
    }

    /// Replaces the built-in validators.
    #[must_use]
    pub fn validators(mut self, validators: ValidatorRegistry) -> Self {
        self.validators = Some(validators);
        self
    }

    /// Fixes the date override expiry is judged against.
    #[must_use]
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, no source provider
    /// was set, or the worker pool cannot be created.
    pub fn build(self) -> Result<ValidationEngine, EngineError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let source = self.source.ok_or(EngineError::MissingSource)?;
        let concurrency = config.validation.effective_concurrency();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(concurrency)
            .thread_name(|i| format!("archtag-worker-{i}"))
            .build()?;

        let today = self
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let policy = config.override_policy(today);

        debug!(concurrency, %today, "validation engine ready");

        Ok(ValidationEngine {
            registry: self.registry.unwrap_or_else(|| Arc::new(Registry::empty())),
            source,
            patterns: self.patterns,
            validators: self.validators.unwrap_or_default(),
            resolver: Resolver::new(),
            results: DashMap::new(),
            policy,
            concurrency,
            pool,
            config,
        })
    }
}

/// Validates files against the architectures their tags name.
///
/// Resolution results and per-file results are cached for the engine's
/// lifetime. The engine is `Sync`; batches run on its own worker pool.
pub struct ValidationEngine {
    config: Config,
    registry: Arc<Registry>,
    source: Arc<dyn SourceProvider>,
    patterns: Option<PatternRegistry>,
    validators: ValidatorRegistry,
    resolver: Resolver,
    results: DashMap<(String, String), ValidationResult>,
    policy: OverridePolicy,
    concurrency: usize,
    pool: rayon::ThreadPool,
}

impl ValidationEngine {
    /// Creates a new engine builder.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the registry snapshot in use.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Number of worker threads.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Resolves one architecture id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id or anything it references is unknown, or
    /// the inheritance chain is circular.
    pub fn resolve(&self, arch_id: &str) -> Result<Arc<ResolvedArchitecture>, ResolveError> {
        self.resolver.resolve(&self.registry, arch_id)
    }

    /// Validates a batch of files. Results come back in input order.
    ///
    /// # Errors
    ///
    /// Returns an error only when the registry topology is broken; one
    /// unreadable or mis-tagged file does not stop the others.
    pub fn validate_files(&self, paths: &[PathBuf]) -> Result<Vec<ValidationResult>, EngineError> {
        info!(files = paths.len(), concurrency = self.concurrency, "validating files");

        let outcomes: Vec<Result<ValidationResult, ResolveError>> = self
            .pool
            .install(|| paths.par_iter().map(|p| self.validate_file(p)).collect());
        let results = outcomes.into_iter().collect::<Result<Vec<_>, _>>()?;

        let failed = results.iter().filter(|r| r.is_failure()).count();
        info!(files = results.len(), failed, "validation finished");
        Ok(results)
    }

    /// Validates a batch and aggregates the results.
    ///
    /// # Errors
    ///
    /// Same as [`Self::validate_files`].
    pub fn validate_report(&self, paths: &[PathBuf]) -> Result<BatchReport, EngineError> {
        Ok(BatchReport::from_results(self.validate_files(paths)?))
    }

    /// Validates one file on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns an error only when the file's architecture cannot be resolved
    /// because of a broken registry topology.
    pub fn validate_file(&self, path: &Path) -> Result<ValidationResult, ResolveError> {
        let file = match self.source.load(path) {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "source unavailable");
                return Ok(ValidationResult::failed(
                    path.to_path_buf(),
                    None,
                    Violation::synthetic(synthetic::SOURCE_UNAVAILABLE, Severity::Error, e.to_string())
                        .with_fix_hint("Make sure the file exists and its semantic model can be built"),
                ));
            }
        };

        let Some(arch_id) = file
            .arch_tag
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        else {
            return Ok(self.untagged(path));
        };

        let resolved = match self.resolve(arch_id) {
            Ok(resolved) => resolved,
            Err(ResolveError::UnknownArchitecture { id }) => {
                warn!(path = %path.display(), arch = %id, "unknown architecture tag");
                return Ok(ValidationResult::failed(
                    path.to_path_buf(),
                    Some(id.clone()),
                    Violation::synthetic(
                        synthetic::UNKNOWN_ARCHITECTURE,
                        Severity::Error,
                        format!("Unknown architecture '{id}'"),
                    )
                    .with_fix_hint("Tag the file with an architecture declared in the registry"),
                ));
            }
            Err(e) => return Err(e),
        };

        let cache_key = self
            .config
            .validation
            .cache
            .then(|| (file.content_hash(), resolved.ruleset.clone()));
        if let Some(key) = &cache_key {
            if let Some(hit) = self.results.get(key) {
                debug!(path = %path.display(), "result cache hit");
                let mut result = hit.value().clone();
                result.file = path.to_path_buf();
                return Ok(result);
            }
        }

        let result = self.check(path, &file, &resolved);
        if let Some(key) = cache_key {
            self.results.insert(key, result.clone());
        }
        Ok(result)
    }

    /// Clears both caches and releases the source provider's resources.
    pub fn dispose(&self) {
        self.resolver.clear();
        self.results.clear();
        self.source.dispose();
        debug!("validation engine disposed");
    }

    /// Number of resolutions computed (cache misses) so far.
    #[must_use]
    pub fn resolution_count(&self) -> usize {
        self.resolver.resolution_count()
    }

    /// Number of cached per-file results.
    #[must_use]
    pub fn cached_results(&self) -> usize {
        self.results.len()
    }

    fn check(&self, path: &Path, file: &SourceFile, resolved: &ResolvedArchitecture) -> ValidationResult {
        let ctx = ValidationContext::new(file).with_patterns(self.patterns.as_ref());
        let raw = self.validators.validate_all(resolved, &ctx);
        debug!(path = %path.display(), arch = %resolved.arch_id, raw = raw.len(), "constraints evaluated");

        let reconciled = reconcile(raw, &file.overrides, &file.intents, &self.policy);
        let mut findings = reconciled.kept;
        findings.extend(self.missing_why(resolved, &findings));
        findings.extend(reconciled.notes);

        if let Some(debt) = &reconciled.debt {
            warn!(
                path = %path.display(),
                active = debt.active,
                limit = debt.limit,
                "file exceeds override limit"
            );
        }

        ValidationResult::from_findings(
            path.to_path_buf(),
            Some(resolved.arch_id.clone()),
            findings,
            reconciled.overridden_count,
        )
        .with_override_debt(reconciled.debt)
    }

    fn missing_why(&self, resolved: &ResolvedArchitecture, findings: &[Violation]) -> Vec<Violation> {
        let severity = match self.config.validation.missing_why {
            MissingWhyPolicy::Ignore => return Vec::new(),
            MissingWhyPolicy::Warning => Severity::Warning,
            MissingWhyPolicy::Error => Severity::Error,
        };

        let mut seen: Vec<&str> = Vec::new();
        let mut notes = Vec::new();
        for v in findings {
            if seen.contains(&v.key.as_str()) {
                continue;
            }
            let Some(c) = resolved.constraint(&v.key) else {
                continue;
            };
            seen.push(v.key.as_str());
            if c.constraint.why.is_some() {
                continue;
            }
            notes.push(
                Violation::synthetic(
                    synthetic::MISSING_WHY,
                    severity,
                    format!("Constraint '{}' (from {}) has no 'why'", c.key, c.source),
                )
                .with_source(c.source.clone())
                .with_fix_hint("Explain the constraint with a 'why' in the architecture registry"),
            );
        }
        notes
    }

    fn untagged(&self, path: &Path) -> ValidationResult {
        let file = path.to_path_buf();
        let message = "File has no @arch tag";
        let hint = "Add an @arch tag naming the file's architecture";
        match self.config.files.untagged.policy {
            UntaggedPolicy::Allow => ValidationResult::from_findings(file, None, Vec::new(), 0),
            UntaggedPolicy::Warn => ValidationResult::from_findings(
                file,
                None,
                vec![Violation::synthetic(synthetic::UNTAGGED, Severity::Warning, message)
                    .with_fix_hint(hint)],
                0,
            ),
            UntaggedPolicy::Deny => ValidationResult::failed(
                file,
                None,
                Violation::synthetic(synthetic::UNTAGGED, Severity::Error, message).with_fix_hint(hint),
            ),
        }
    }
}

impl std::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("architectures", &self.registry.len())
            .field("concurrency", &self.concurrency)
            .field("cached_results", &self.results.len())
            .finish_non_exhaustive()
    }
}
