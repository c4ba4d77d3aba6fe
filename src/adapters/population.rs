//! Population statistics adapter.
//!
//! Growth defaults are keyed by territorial authority (the statistical
//! boundary population data is reported against), with a global default for
//! unknown authorities.

use crate::adapters::{Band, CountRange, SourceAdapter, Upstream};
use crate::error::AdapterError;
use crate::models::{Entity, MetricsFragment, PopulationFragment};
use async_trait::async_trait;
use rand::rngs::StdRng;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::warn;

const FIELDS: &[&str] = &["populationGrowth", "totalPopulation", "netMigration"];

/// Fallback tables and derivation bands. Part of the adapter contract and
/// externally configurable so tests can pin exact values.
#[derive(Debug, Clone)]
pub struct PopulationDefaults {
    pub growth_by_authority: HashMap<String, f64>,
    pub global_growth: f64,
    pub growth_jitter: f64,
    pub migration_range: CountRange,
    pub population_base: u64,
    pub population_span: u64,
}

impl Default for PopulationDefaults {
    fn default() -> Self {
        let growth_by_authority = [
            ("Auckland", 2.5),
            ("Wellington", -0.1),
            ("Christchurch", 1.8),
            ("Hamilton", 3.1),
            ("Tauranga", 2.8),
            ("Dunedin", 1.2),
            ("Palmerston North", 2.1),
            ("New Plymouth", 1.8),
            ("Whangarei", 2.5),
            ("Hastings", 1.9),
            ("Nelson", 1.5),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            growth_by_authority,
            global_growth: 1.5,
            growth_jitter: 0.25,
            migration_range: CountRange::new(-50, 150),
            population_base: 50_000,
            population_span: 100_000,
        }
    }
}

/// Upstream payload for population statistics.
#[derive(Debug, Deserialize)]
struct PopulationUpstream {
    growth: f64,
    total: f64,
}

pub struct PopulationAdapter {
    defaults: PopulationDefaults,
    upstream: Option<Upstream>,
    rng: Mutex<StdRng>,
}

impl PopulationAdapter {
    pub fn new(defaults: PopulationDefaults, rng: StdRng) -> Self {
        Self {
            defaults,
            upstream: None,
            rng: Mutex::new(rng),
        }
    }

    pub fn with_upstream(mut self, upstream: Upstream) -> Self {
        self.upstream = Some(upstream);
        self
    }

    fn fallback(&self, entity: &Entity) -> PopulationFragment {
        let mut rng = self.rng.lock().expect("population rng poisoned");
        let base = self
            .defaults
            .growth_by_authority
            .get(&entity.territorial_authority)
            .copied()
            .unwrap_or(self.defaults.global_growth);
        let growth = Band::new(base, self.defaults.growth_jitter).sample(&mut rng);
        let total = self.defaults.population_base
            + CountRange::new(0, self.defaults.population_span as i64).sample(&mut rng) as u64;
        let migration = self.defaults.migration_range.sample(&mut rng);

        PopulationFragment {
            population_growth: growth,
            total_population: total,
            net_migration: migration,
        }
    }

    fn from_upstream(&self, data: PopulationUpstream) -> PopulationFragment {
        let mut rng = self.rng.lock().expect("population rng poisoned");
        PopulationFragment {
            population_growth: data.growth,
            total_population: data.total.max(0.0).round() as u64,
            net_migration: self.defaults.migration_range.sample(&mut rng),
        }
    }
}

#[async_trait]
impl SourceAdapter for PopulationAdapter {
    fn name(&self) -> &'static str {
        "population"
    }

    fn field_names(&self) -> &'static [&'static str] {
        FIELDS
    }

    async fn fetch(&self, entity: &Entity) -> Result<MetricsFragment, AdapterError> {
        if let Some(upstream) = &self.upstream {
            match upstream
                .get_json::<PopulationUpstream>(
                    "population",
                    &[("authority", &entity.territorial_authority)],
                )
                .await
            {
                Ok(data) => return Ok(MetricsFragment::Population(self.from_upstream(data))),
                Err(e) => {
                    warn!(
                        suburb = %entity.name,
                        authority = %entity.territorial_authority,
                        error = %e,
                        "population upstream failed, using regional defaults"
                    );
                }
            }
        }
        Ok(MetricsFragment::Population(self.fallback(entity)))
    }
}
