//! Source adapters: pluggable per-entity data sources.
//!
//! Each adapter fetches one fragment for one entity. Upstream calls are
//! retried with bounded backoff; any failure degrades to the adapter's
//! deterministic regional-default table plus bounded jitter, so the pipeline
//! always receives a usable fragment. Fragment field sets are disjoint across
//! adapters and that is validated once at startup.

pub mod economic;
pub mod market;
pub mod population;

use crate::error::{AdapterError, ConfigError};
use crate::models::{Entity, MetricsFragment};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use rand::rngs::StdRng;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub use economic::{EconomicAdapter, EconomicDefaults};
pub use market::{MarketAdapter, MarketDefaults};
pub use population::{PopulationAdapter, PopulationDefaults};

/// A per-entity data source.
///
/// `fetch` must not surface upstream failures: production adapters recover
/// them internally via regional defaults. An `Err` here means a programming
/// error and makes the orchestrator skip the entity for the cycle.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Serialized field names this adapter's fragment contributes. Used by
    /// the startup disjointness validation.
    fn field_names(&self) -> &'static [&'static str];

    async fn fetch(&self, entity: &Entity) -> Result<MetricsFragment, AdapterError>;
}

/// Validate that no two adapters claim the same metrics field. A collision is
/// a programming-contract violation, fatal at startup, never per cycle.
pub fn validate_field_disjointness(
    adapters: &[Arc<dyn SourceAdapter>],
) -> Result<(), ConfigError> {
    let mut owners: HashMap<&'static str, &'static str> = HashMap::new();
    for adapter in adapters {
        for field in adapter.field_names() {
            if let Some(first) = owners.insert(field, adapter.name()) {
                return Err(ConfigError::FragmentFieldCollision {
                    field,
                    first,
                    second: adapter.name(),
                });
            }
        }
    }
    Ok(())
}

/// A base value with a symmetric uniform jitter band. `jitter == 0` makes the
/// sample deterministic, which is how tests pin exact values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Band {
    pub base: f64,
    pub jitter: f64,
}

impl Band {
    pub fn new(base: f64, jitter: f64) -> Self {
        Self { base, jitter }
    }

    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        if self.jitter <= 0.0 {
            self.base
        } else {
            self.base + rng.gen_range(-self.jitter..=self.jitter)
        }
    }
}

/// Inclusive uniform integer range for count fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CountRange {
    pub min: i64,
    pub max: i64,
}

impl CountRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut StdRng) -> i64 {
        if self.min >= self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

/// An optional upstream HTTP endpoint for an adapter. Requests are retried
/// with exponential backoff before the adapter falls back to its defaults.
#[derive(Debug, Clone)]
pub struct Upstream {
    base_url: String,
    client: reqwest::Client,
}

impl Upstream {
    pub fn new(base_url: String) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| ConfigError::InvalidUpstream {
                url: base_url.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AdapterError> {
        let url = format!("{}/{}", self.base_url, path);
        let request = || async {
            let response = self
                .client
                .get(&url)
                .query(query)
                .send()
                .await
                .map_err(|e| AdapterError::Upstream(e.to_string()))?;
            if !response.status().is_success() {
                return Err(AdapterError::Upstream(format!(
                    "unexpected status {}",
                    response.status()
                )));
            }
            response
                .json::<T>()
                .await
                .map_err(|e| AdapterError::Payload(e.to_string()))
        };

        request
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(50))
                    .with_max_times(2),
            )
            .when(|e| matches!(e, AdapterError::Upstream(_)))
            .await
    }
}
