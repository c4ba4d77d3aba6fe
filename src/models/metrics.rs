//! Metrics fragments, the merged record, and the published suburb record.
//!
//! Fragments are statically disjoint typed structs: each adapter variant owns
//! its own fields, so a merge can never silently overwrite another source's
//! data. Everything serializes camelCase so field names round-trip the JSON
//! API losslessly.

use crate::models::entity::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Partial measurement produced by the population source for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationFragment {
    /// Annual population growth, percent.
    pub population_growth: f64,
    pub total_population: u64,
    /// Net migration, persons per year (may be negative).
    pub net_migration: i64,
}

/// Partial measurement produced by the market source for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketFragment {
    pub median_price: f64,
    pub days_on_market: f64,
    pub sales_volume: u32,
    /// Rental vacancy rate, percent.
    pub rental_vacancy: f64,
}

/// Partial measurement produced by the demographic/economic source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicFragment {
    pub employment_growth: f64,
    pub unemployment_rate: f64,
    pub income_growth: f64,
    pub rental_yield: f64,
    pub building_consents: u32,
    /// Owner-occupier percentage, classification-adjusted.
    pub ownership_rate: f64,
    /// 0 (safest) to 100, classification-adjusted.
    pub crime_index: f64,
    pub school_index: f64,
    pub infrastructure_index: f64,
    pub safety_index: f64,
    /// Price-to-income style index; higher is less affordable.
    pub affordability_index: f64,
}

/// One adapter's output for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum MetricsFragment {
    Population(PopulationFragment),
    Market(MarketFragment),
    Economic(EconomicFragment),
}

impl MetricsFragment {
    pub fn source_name(&self) -> &'static str {
        match self {
            MetricsFragment::Population(_) => "population",
            MetricsFragment::Market(_) => "market",
            MetricsFragment::Economic(_) => "economic",
        }
    }
}

/// Risk banding of the signal score, inclusive lower bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    #[serde(rename = "Low-Medium")]
    LowMedium,
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
}

/// Union of all fragments plus the derived fields. Immutable once built: a
/// new cycle produces a wholly new record, never an in-place patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRecord {
    // Population source
    pub population_growth: f64,
    pub total_population: u64,
    pub net_migration: i64,

    // Market source
    pub median_price: f64,
    pub days_on_market: f64,
    pub sales_volume: u32,
    pub rental_vacancy: f64,

    // Demographic/economic source
    pub employment_growth: f64,
    pub unemployment_rate: f64,
    pub income_growth: f64,
    pub rental_yield: f64,
    pub building_consents: u32,
    pub ownership_rate: f64,
    pub crime_index: f64,
    pub school_index: f64,
    pub infrastructure_index: f64,
    pub safety_index: f64,
    pub affordability_index: f64,

    // Derived
    pub signal_score: u8,
    /// 12-month outlook, signed, one fractional digit. A heuristic transform
    /// of the score, not a calibrated forecast.
    pub prediction_12m: f64,
    pub risk_level: RiskLevel,
    pub last_updated: DateTime<Utc>,
    pub cycle_id: u64,
}

/// Published record: stable `id` plus the latest metrics for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuburbRecord {
    pub id: u64,
    #[serde(flatten)]
    pub entity: Entity,
    pub current_metrics: MetricsRecord,
}

/// Summary of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub cycle_id: u64,
    pub attempted: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub completed_at: DateTime<Utc>,
}
