//! Error taxonomy, split by failure boundary.
//!
//! Configuration errors are fatal at startup. Adapter and merge errors are
//! contained to one entity within a cycle. `CycleError::Busy` is the refresh
//! protocol's only runtime rejection.

use thiserror::Error;

/// Startup-time configuration problems. Never produced during a cycle.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicate entity name in catalog: {0}")]
    DuplicateEntity(String),

    #[error("metrics field '{field}' claimed by both '{first}' and '{second}' adapters")]
    FragmentFieldCollision {
        field: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("invalid cron expression '{expr}'")]
    InvalidSchedule {
        expr: String,
        #[source]
        source: cron::error::Error,
    },

    #[error("invalid upstream url '{url}': {reason}")]
    InvalidUpstream { url: String, reason: String },
}

/// A source adapter failure that survived fallback. Production adapters
/// degrade to defaults internally, so this only surfaces from adapters
/// without a fallback path (e.g. test doubles).
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Transport or non-success status. Retryable.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// Response body did not decode. Not retryable.
    #[error("upstream payload invalid: {0}")]
    Payload(String),
}

/// Fragment-set violations found while merging one entity's fragments.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("duplicate '{0}' fragment for entity")]
    DuplicateFragment(&'static str),

    #[error("missing '{0}' fragment for entity")]
    MissingFragment(&'static str),
}

/// Any failure processing a single entity. The orchestrator logs it and
/// skips the entity for the cycle.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// Refresh protocol rejection.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("a refresh cycle is already running")]
    Busy,
}
