#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use anyhow::{Result, bail};

use crate::reconcile::{DEFAULT_CONCURRENCY, MalformedPolicy};

/// Environment variable naming the JSON store document.
pub const STORE_ENV: &str = "REGRADE_STORE";
/// Environment variable bounding in-flight recomputations.
pub const CONCURRENCY_ENV: &str = "REGRADE_CONCURRENCY";
/// Environment variable selecting `lenient` or `strict` malformed handling.
pub const MALFORMED_ENV: &str = "REGRADE_MALFORMED";
/// Environment variable turning every backfill into a dry run.
pub const DRY_RUN_ENV: &str = "REGRADE_DRY_RUN";

/// Parses the malformed-question policy, defaulting to
/// `MalformedPolicy::Lenient` when unset or unrecognised.
fn parse_malformed_policy(val: Option<String>) -> MalformedPolicy {
    match val.as_deref().map(MalformedPolicy::parse) {
        Some(Some(policy)) => policy,
        Some(None) => {
            tracing::warn!("Ignoring unrecognised {MALFORMED_ENV}; using lenient grading");
            MalformedPolicy::Lenient
        }
        None => MalformedPolicy::Lenient,
    }
}

/// Parses a boolean flag, accepting `1`/`true`/`yes`/`on`.
fn parse_flag(val: Option<String>) -> bool {
    matches!(
        val.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

/// Reads the concurrency bound, falling back to `default` when missing and
/// failing when it is not a positive integer.
fn read_concurrency(env: &str, default: usize) -> Result<usize> {
    match std::env::var(env) {
        Err(_) => Ok(default),
        Ok(value) => match value.trim().parse::<usize>() {
            Ok(0) | Err(_) => bail!("{env} must be a positive integer, got `{value}`"),
            Ok(n) => Ok(n),
        },
    }
}

/// Runtime configuration shared across the crate.
#[derive(Debug, Clone)]
pub struct ConfigState {
    /// JSON store used when the command line names none.
    store_path:  Option<PathBuf>,
    /// Maximum number of responses regraded at once.
    concurrency: usize,
    /// Handling of malformed questions.
    malformed:   MalformedPolicy,
    /// Whether backfills default to dry runs.
    dry_run:     bool,
}

impl ConfigState {
    /// Construct a new configuration instance from the environment.
    fn new() -> Result<Self> {
        let store_path = std::env::var(STORE_ENV)
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            store_path,
            concurrency: read_concurrency(CONCURRENCY_ENV, DEFAULT_CONCURRENCY)?,
            malformed: parse_malformed_policy(std::env::var(MALFORMED_ENV).ok()),
            dry_run: parse_flag(std::env::var(DRY_RUN_ENV).ok()),
        })
    }

    /// Returns the configured store path, if any.
    pub fn store_path(&self) -> Option<&Path> {
        self.store_path.as_deref()
    }

    /// Returns the concurrency bound.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the malformed-question policy.
    pub fn malformed(&self) -> MalformedPolicy {
        self.malformed
    }

    /// Returns whether backfills default to dry runs.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Shared configuration handle used throughout the crate.
#[derive(Clone)]
pub struct ConfigHandle(Arc<ConfigState>);

impl std::ops::Deref for ConfigHandle {
    type Target = ConfigState;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Global storage for the lazily constructed configuration state.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<ConfigState>>>> = OnceLock::new();

/// Returns the mutex guarding the global configuration slot.
fn slot() -> &'static Mutex<Option<Arc<ConfigState>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Ensure the global configuration has been initialized and return a handle.
pub fn ensure_initialized() -> Result<ConfigHandle> {
    let mut guard = slot().lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(cfg) = guard.as_ref() {
        return Ok(ConfigHandle(Arc::clone(cfg)));
    }

    let cfg = Arc::new(ConfigState::new()?);
    *guard = Some(Arc::clone(&cfg));
    Ok(ConfigHandle(cfg))
}

/// Drops the cached configuration so the next access re-reads the
/// environment.
pub fn reset() {
    *slot().lock().unwrap_or_else(PoisonError::into_inner) = None;
}
