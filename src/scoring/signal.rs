//! Composite signal score, 12-month prediction and risk banding.

use crate::models::{
    EconomicFragment, MarketFragment, PopulationFragment, RiskLevel,
};
use crate::scoring::weights::ScoringWeights;

// Multiplicative adjustments, applied in this exact order (they commute up to
// floating-point rounding, so the order is fixed to keep results
// reproducible):
//   1. population growth < 0        -> POP_DECLINE_PENALTY
//   2. employment growth < -1       -> EMP_DECLINE_PENALTY
//   3. population growth > 3        -> POP_BOOM_BONUS
//   4. employment growth > 2        -> EMP_BOOM_BONUS
//   5. ownership rate > 75          -> OWNERSHIP_BONUS
//   6. crime index < 25             -> LOW_CRIME_BONUS
const POP_DECLINE_PENALTY: f64 = 0.7;
const EMP_DECLINE_PENALTY: f64 = 0.8;
const POP_BOOM_BONUS: f64 = 1.1;
const EMP_BOOM_BONUS: f64 = 1.05;
const OWNERSHIP_BONUS: f64 = 1.03;
const LOW_CRIME_BONUS: f64 = 1.02;

fn demand_score(
    population: &PopulationFragment,
    economic: &EconomicFragment,
    w: &ScoringWeights,
) -> f64 {
    population.population_growth.max(0.0) * w.population_growth
        + economic.employment_growth.max(0.0) * w.employment_growth
        + economic.income_growth * w.income_growth
        + population.net_migration as f64 / w.migration_divisor
        + economic.rental_yield * w.rental_yield
        + (10.0 - (economic.unemployment_rate - 3.0).max(0.0)) * w.unemployment
        + economic.ownership_rate / 10.0 * w.ownership
        + economic.school_index * w.school
        + economic.infrastructure_index * w.infrastructure
        + economic.safety_index * w.safety
}

fn supply_score(market: &MarketFragment, economic: &EconomicFragment, w: &ScoringWeights) -> f64 {
    economic.building_consents as f64 / w.consents_divisor
        + market.days_on_market / w.days_divisor
        + market.sales_volume as f64 / w.sales_divisor
        + market.rental_vacancy * w.vacancy_weight
        + economic.affordability_index * w.affordability_weight
}

/// Composite 0-100 demand-vs-supply score.
pub fn signal_score(
    population: &PopulationFragment,
    market: &MarketFragment,
    economic: &EconomicFragment,
    w: &ScoringWeights,
) -> u8 {
    let demand = demand_score(population, economic, w);
    let supply = supply_score(market, economic, w);
    let raw = demand / supply.max(w.supply_floor) * w.scale_factor;

    let mut adjusted = raw;
    if population.population_growth < 0.0 {
        adjusted *= POP_DECLINE_PENALTY;
    }
    if economic.employment_growth < -1.0 {
        adjusted *= EMP_DECLINE_PENALTY;
    }
    if population.population_growth > 3.0 {
        adjusted *= POP_BOOM_BONUS;
    }
    if economic.employment_growth > 2.0 {
        adjusted *= EMP_BOOM_BONUS;
    }
    if economic.ownership_rate > 75.0 {
        adjusted *= OWNERSHIP_BONUS;
    }
    if economic.crime_index < 25.0 {
        adjusted *= LOW_CRIME_BONUS;
    }

    adjusted.round().clamp(0.0, 100.0) as u8
}

/// 12-month outlook: a zero-centered transform of the score plus bounded
/// jitter, rounded to one fractional digit. A heuristic placeholder, not a
/// calibrated forecast.
pub fn prediction_12m(signal_score: u8, jitter: f64) -> f64 {
    let base = (signal_score as f64 - 50.0) / 10.0;
    ((base + jitter) * 10.0).round() / 10.0
}

/// Five-bucket step function of the signal score, inclusive lower bounds: a
/// score of exactly 80 is Low.
pub fn risk_level(signal_score: u8) -> RiskLevel {
    match signal_score {
        80..=u8::MAX => RiskLevel::Low,
        65..=79 => RiskLevel::LowMedium,
        50..=64 => RiskLevel::Medium,
        35..=49 => RiskLevel::MediumHigh,
        _ => RiskLevel::High,
    }
}
