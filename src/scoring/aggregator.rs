//! Merges adapter fragments into a complete metrics record.

use crate::error::MergeError;
use crate::models::{
    EconomicFragment, MarketFragment, MetricsFragment, MetricsRecord, PopulationFragment,
};
use crate::scoring::signal::{prediction_12m, risk_level, signal_score};
use crate::scoring::weights::ScoringWeights;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Mutex;

/// Cycle-scoped merge of the three source fragments plus derived-field
/// computation. Field-level disjointness is guaranteed statically by the
/// typed fragments (and validated against adapter declarations at startup);
/// here only duplicate or missing fragment variants can fail.
pub struct MetricsAggregator {
    weights: ScoringWeights,
    rng: Mutex<StdRng>,
}

impl MetricsAggregator {
    pub fn new(weights: ScoringWeights, rng: StdRng) -> Self {
        Self {
            weights,
            rng: Mutex::new(rng),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    fn prediction_jitter(&self) -> f64 {
        let j = self.weights.prediction_jitter;
        if j <= 0.0 {
            return 0.0;
        }
        let mut rng = self.rng.lock().expect("aggregator rng poisoned");
        rng.gen_range(-j..=j)
    }

    /// Merge one entity's fragments into a record stamped with the cycle id.
    pub fn merge(
        &self,
        fragments: Vec<MetricsFragment>,
        cycle_id: u64,
        now: DateTime<Utc>,
    ) -> Result<MetricsRecord, MergeError> {
        let mut population: Option<PopulationFragment> = None;
        let mut market: Option<MarketFragment> = None;
        let mut economic: Option<EconomicFragment> = None;

        for fragment in fragments {
            let name = fragment.source_name();
            let slot_taken = match fragment {
                MetricsFragment::Population(f) => population.replace(f).is_some(),
                MetricsFragment::Market(f) => market.replace(f).is_some(),
                MetricsFragment::Economic(f) => economic.replace(f).is_some(),
            };
            if slot_taken {
                return Err(MergeError::DuplicateFragment(name));
            }
        }

        let population = population.ok_or(MergeError::MissingFragment("population"))?;
        let market = market.ok_or(MergeError::MissingFragment("market"))?;
        let economic = economic.ok_or(MergeError::MissingFragment("economic"))?;

        let score = signal_score(&population, &market, &economic, &self.weights);
        let prediction = prediction_12m(score, self.prediction_jitter());
        let risk = risk_level(score);

        Ok(MetricsRecord {
            population_growth: population.population_growth,
            total_population: population.total_population,
            net_migration: population.net_migration,
            median_price: market.median_price,
            days_on_market: market.days_on_market,
            sales_volume: market.sales_volume,
            rental_vacancy: market.rental_vacancy,
            employment_growth: economic.employment_growth,
            unemployment_rate: economic.unemployment_rate,
            income_growth: economic.income_growth,
            rental_yield: economic.rental_yield,
            building_consents: economic.building_consents,
            ownership_rate: economic.ownership_rate,
            crime_index: economic.crime_index,
            school_index: economic.school_index,
            infrastructure_index: economic.infrastructure_index,
            safety_index: economic.safety_index,
            affordability_index: economic.affordability_index,
            signal_score: score,
            prediction_12m: prediction,
            risk_level: risk,
            last_updated: now,
            cycle_id,
        })
    }
}
