//! Unit tests for the signal score, prediction and risk banding.

use propsignal::models::{EconomicFragment, MarketFragment, PopulationFragment, RiskLevel};
use propsignal::scoring::{prediction_12m, risk_level, signal_score, ScoringWeights};
use proptest::prelude::*;

fn population(growth: f64, migration: i64) -> PopulationFragment {
    PopulationFragment {
        population_growth: growth,
        total_population: 50_000,
        net_migration: migration,
    }
}

fn market(days: f64, sales: u32, vacancy: f64) -> MarketFragment {
    MarketFragment {
        median_price: 700_000.0,
        days_on_market: days,
        sales_volume: sales,
        rental_vacancy: vacancy,
    }
}

#[allow(clippy::too_many_arguments)]
fn economic(
    employment: f64,
    unemployment: f64,
    income: f64,
    yield_pct: f64,
    consents: u32,
    ownership: f64,
    crime: f64,
    affordability: f64,
) -> EconomicFragment {
    EconomicFragment {
        employment_growth: employment,
        unemployment_rate: unemployment,
        income_growth: income,
        rental_yield: yield_pct,
        building_consents: consents,
        ownership_rate: ownership,
        crime_index: crime,
        school_index: 6.0,
        infrastructure_index: 6.0,
        safety_index: 6.0,
        affordability_index: affordability,
    }
}

#[test]
fn risk_level_is_a_step_function_with_inclusive_lower_bounds() {
    let cases = [
        (95, RiskLevel::Low),
        (80, RiskLevel::Low),
        (79, RiskLevel::LowMedium),
        (65, RiskLevel::LowMedium),
        (50, RiskLevel::Medium),
        (35, RiskLevel::MediumHigh),
        (34, RiskLevel::High),
        (0, RiskLevel::High),
    ];
    for (score, expected) in cases {
        assert_eq!(risk_level(score), expected, "score {}", score);
    }
}

#[test]
fn prediction_is_a_zero_centered_one_decimal_transform() {
    assert_eq!(prediction_12m(50, 0.0), 0.0);
    assert_eq!(prediction_12m(73, 0.0), 2.3);
    assert_eq!(prediction_12m(7, 0.0), -4.3);
    assert_eq!(prediction_12m(100, 0.0), 5.0);
    // Jitter shifts before rounding
    assert_eq!(prediction_12m(50, 0.26), 0.3);
    assert_eq!(prediction_12m(50, -0.26), -0.3);
}

#[test]
fn population_decline_penalty_reduces_the_score() {
    let w = ScoringWeights::default();
    let mk = market(50.0, 90, 2.0);
    let ec = economic(1.0, 5.0, 2.0, 5.0, 45, 65.0, 40.0, 6.5);

    let growing = signal_score(&population(0.5, 30), &mk, &ec, &w);
    let declining = signal_score(&population(-0.5, 30), &mk, &ec, &w);
    assert!(
        declining < growing,
        "declining {} should score below growing {}",
        declining,
        growing
    );
}

#[test]
fn supply_floor_prevents_division_blowup() {
    let w = ScoringWeights::default();
    let pop = population(1.0, 30);
    let ec = economic(1.0, 5.0, 2.0, 5.0, 0, 65.0, 40.0, 1.0);
    // Both markets are below the supply floor, so they score identically.
    let near_zero = signal_score(&pop, &market(1.0, 0, 0.5), &ec, &w);
    let slightly_more = signal_score(&pop, &market(5.0, 0, 0.5), &ec, &w);
    assert_eq!(near_zero, slightly_more);
}

proptest! {
    /// The composite score is always an integer in [0, 100] across the full
    /// plausible input range.
    #[test]
    fn signal_score_is_always_within_bounds(
        pop_growth in -3.0..6.0f64,
        migration in -200i64..400,
        emp_growth in -4.0..5.0f64,
        unemployment in 1.0..12.0f64,
        income in 0.0..5.0f64,
        yield_pct in 1.0..9.0f64,
        consents in 0u32..120,
        ownership in 30.0..95.0f64,
        crime in 0.0..100.0f64,
        days in 1.0..120.0f64,
        sales in 0u32..250,
        vacancy in 0.0..8.0f64,
        affordability in 2.0..14.0f64,
    ) {
        let w = ScoringWeights::default();
        let score = signal_score(
            &population(pop_growth, migration),
            &market(days, sales, vacancy),
            &economic(
                emp_growth,
                unemployment,
                income,
                yield_pct,
                consents,
                ownership,
                crime,
                affordability,
            ),
            &w,
        );
        prop_assert!(score <= 100);
    }
}
