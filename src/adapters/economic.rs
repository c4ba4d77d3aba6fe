//! Demographic/economic adapter: employment, incomes, yields and the
//! neighbourhood indices.
//!
//! Ownership, crime and infrastructure are classification-adjusted: an
//! additive offset keyed by the entity's classification is applied to the
//! base before jitter, then the value is clamped to its documented band.

use crate::adapters::{Band, CountRange, SourceAdapter, Upstream};
use crate::error::AdapterError;
use crate::models::{Classification, EconomicFragment, Entity, MetricsFragment};
use async_trait::async_trait;
use rand::rngs::StdRng;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::warn;

const FIELDS: &[&str] = &[
    "employmentGrowth",
    "unemploymentRate",
    "incomeGrowth",
    "rentalYield",
    "buildingConsents",
    "ownershipRate",
    "crimeIndex",
    "schoolIndex",
    "infrastructureIndex",
    "safetyIndex",
    "affordabilityIndex",
];

/// Regional economic base rates.
#[derive(Debug, Clone, Copy)]
pub struct EconomicBase {
    pub employment_growth: f64,
    pub unemployment_rate: f64,
    pub rental_yield: f64,
    pub affordability_index: f64,
}

/// A classification-adjusted field: base plus per-classification offset, then
/// jitter, then clamp.
#[derive(Debug, Clone)]
pub struct AdjustedBand {
    pub band: Band,
    pub offsets: HashMap<Classification, f64>,
    pub min: f64,
    pub max: f64,
}

impl AdjustedBand {
    fn sample(&self, classification: Classification, rng: &mut StdRng) -> f64 {
        let offset = self.offsets.get(&classification).copied().unwrap_or(0.0);
        let shifted = Band::new(self.band.base + offset, self.band.jitter);
        shifted.sample(rng).clamp(self.min, self.max)
    }
}

/// Fallback tables and derivation bands for the economic adapter.
#[derive(Debug, Clone)]
pub struct EconomicDefaults {
    pub by_region: HashMap<String, EconomicBase>,
    pub global: EconomicBase,
    pub rate_jitter: f64,
    pub affordability_jitter: f64,
    pub income_growth: Band,
    pub consents_range: CountRange,
    pub ownership: AdjustedBand,
    pub crime: AdjustedBand,
    pub infrastructure: AdjustedBand,
    pub school: Band,
    pub school_min: f64,
    pub school_max: f64,
    pub safety: Band,
    pub safety_min: f64,
    pub safety_max: f64,
}

impl Default for EconomicDefaults {
    fn default() -> Self {
        use Classification::*;

        let by_region = [
            ("Auckland", 1.5, 4.8, 3.8, 9.0),
            ("Wellington", -0.2, 5.5, 5.0, 7.5),
            ("Canterbury", 2.0, 4.5, 4.8, 6.5),
            ("Bay of Plenty", 2.2, 4.7, 4.4, 8.0),
            ("Waikato", 2.3, 4.8, 4.6, 6.8),
            ("Otago", 1.8, 5.2, 6.2, 6.4),
            ("Manawatu-Whanganui", 2.2, 4.9, 5.8, 5.6),
            ("Taranaki", 2.1, 4.6, 5.9, 5.4),
            ("Northland", 1.9, 5.3, 5.5, 6.2),
            ("Hawke's Bay", 2.3, 4.8, 5.1, 6.3),
            ("Nelson", 1.8, 4.4, 4.6, 7.2),
        ]
        .into_iter()
        .map(
            |(region, employment_growth, unemployment_rate, rental_yield, affordability_index)| {
                (
                    region.to_string(),
                    EconomicBase {
                        employment_growth,
                        unemployment_rate,
                        rental_yield,
                        affordability_index,
                    },
                )
            },
        )
        .collect();

        Self {
            by_region,
            global: EconomicBase {
                employment_growth: 2.0,
                unemployment_rate: 4.5,
                rental_yield: 4.8,
                affordability_index: 6.5,
            },
            rate_jitter: 0.25,
            affordability_jitter: 0.5,
            income_growth: Band::new(2.5, 1.0),
            consents_range: CountRange::new(20, 80),
            ownership: AdjustedBand {
                band: Band::new(65.0, 3.0),
                offsets: [(Inner, -10.0), (Outer, 5.0), (Rural, 8.0), (Coastal, 2.0), (Tourism, -5.0)]
                    .into_iter()
                    .collect(),
                min: 35.0,
                max: 90.0,
            },
            crime: AdjustedBand {
                band: Band::new(40.0, 5.0),
                offsets: [(Inner, 10.0), (Outer, 0.0), (Rural, -10.0), (Coastal, -5.0), (Tourism, 5.0)]
                    .into_iter()
                    .collect(),
                min: 5.0,
                max: 95.0,
            },
            infrastructure: AdjustedBand {
                band: Band::new(6.0, 1.0),
                offsets: [(Inner, 2.0), (Outer, 0.0), (Rural, -2.0), (Coastal, 0.0), (Tourism, 1.0)]
                    .into_iter()
                    .collect(),
                min: 1.0,
                max: 10.0,
            },
            school: Band::new(6.5, 1.5),
            school_min: 1.0,
            school_max: 10.0,
            safety: Band::new(6.5, 1.0),
            safety_min: 1.0,
            safety_max: 10.0,
        }
    }
}

/// Upstream payload for regional economic rates. The remaining fragment
/// fields are always derived locally.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EconomicUpstream {
    employment_growth: f64,
    unemployment_rate: f64,
    rental_yield: f64,
}

pub struct EconomicAdapter {
    defaults: EconomicDefaults,
    upstream: Option<Upstream>,
    rng: Mutex<StdRng>,
}

impl EconomicAdapter {
    pub fn new(defaults: EconomicDefaults, rng: StdRng) -> Self {
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

    fn base_for(&self, entity: &Entity) -> EconomicBase {
        self.defaults
            .by_region
            .get(&entity.region)
            .copied()
            .unwrap_or(self.defaults.global)
    }

    /// Build the fragment from the three regional rates, deriving everything
    /// else from the configured bands.
    fn build(
        &self,
        entity: &Entity,
        employment_growth: f64,
        unemployment_rate: f64,
        rental_yield: f64,
    ) -> EconomicFragment {
        let d = &self.defaults;
        let base = self.base_for(entity);
        let mut rng = self.rng.lock().expect("economic rng poisoned");

        EconomicFragment {
            employment_growth,
            unemployment_rate,
            rental_yield,
            income_growth: d.income_growth.sample(&mut rng).max(0.0),
            building_consents: d.consents_range.sample(&mut rng).max(0) as u32,
            ownership_rate: d.ownership.sample(entity.classification, &mut rng),
            crime_index: d.crime.sample(entity.classification, &mut rng),
            school_index: d
                .school
                .sample(&mut rng)
                .clamp(d.school_min, d.school_max),
            infrastructure_index: d.infrastructure.sample(entity.classification, &mut rng),
            safety_index: d
                .safety
                .sample(&mut rng)
                .clamp(d.safety_min, d.safety_max),
            affordability_index: Band::new(base.affordability_index, d.affordability_jitter)
                .sample(&mut rng)
                .max(1.0),
        }
    }

    fn fallback(&self, entity: &Entity) -> EconomicFragment {
        let base = self.base_for(entity);
        let (employment, unemployment, rental_yield) = {
            let mut rng = self.rng.lock().expect("economic rng poisoned");
            (
                Band::new(base.employment_growth, self.defaults.rate_jitter).sample(&mut rng),
                Band::new(base.unemployment_rate, self.defaults.rate_jitter)
                    .sample(&mut rng)
                    .max(0.0),
                Band::new(base.rental_yield, self.defaults.rate_jitter)
                    .sample(&mut rng)
                    .max(0.0),
            )
        };
        self.build(entity, employment, unemployment, rental_yield)
    }
}

#[async_trait]
impl SourceAdapter for EconomicAdapter {
    fn name(&self) -> &'static str {
        "economic"
    }

    fn field_names(&self) -> &'static [&'static str] {
        FIELDS
    }

    async fn fetch(&self, entity: &Entity) -> Result<MetricsFragment, AdapterError> {
        if let Some(upstream) = &self.upstream {
            match upstream
                .get_json::<EconomicUpstream>("economic", &[("region", &entity.region)])
                .await
            {
                Ok(data) => {
                    return Ok(MetricsFragment::Economic(self.build(
                        entity,
                        data.employment_growth,
                        data.unemployment_rate.max(0.0),
                        data.rental_yield.max(0.0),
                    )));
                }
                Err(e) => {
                    warn!(
                        suburb = %entity.name,
                        region = %entity.region,
                        error = %e,
                        "economic upstream failed, using regional defaults"
                    );
                }
            }
        }
        Ok(MetricsFragment::Economic(self.fallback(entity)))
    }
}
