//! Scoring parameters. The formula shape is fixed in `signal.rs`; these
//! weights tune it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    // Demand terms
    pub population_growth: f64,
    pub employment_growth: f64,
    pub income_growth: f64,
    /// Net migration is scaled down by this divisor before summing.
    pub migration_divisor: f64,
    pub rental_yield: f64,
    /// Weight on the inverted-unemployment term `10 - max(u - 3, 0)`.
    pub unemployment: f64,
    /// Weight on ownership stability (`ownership_rate / 10`).
    pub ownership: f64,
    pub school: f64,
    pub infrastructure: f64,
    pub safety: f64,

    // Supply terms
    pub consents_divisor: f64,
    pub days_divisor: f64,
    pub sales_divisor: f64,
    pub vacancy_weight: f64,
    pub affordability_weight: f64,

    // Ratio shaping
    /// Prevents division blow-up when supply is near zero.
    pub supply_floor: f64,
    /// Normalizes the demand/supply ratio into a 0-100-ish range.
    pub scale_factor: f64,

    /// Symmetric jitter band for the 12-month prediction. Zero makes the
    /// prediction deterministic.
    pub prediction_jitter: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            population_growth: 12.0,
            employment_growth: 10.0,
            income_growth: 8.0,
            migration_divisor: 15.0,
            rental_yield: 6.0,
            unemployment: 4.0,
            ownership: 1.5,
            school: 1.0,
            infrastructure: 1.0,
            safety: 1.0,
            consents_divisor: 3.0,
            days_divisor: 2.5,
            sales_divisor: 15.0,
            vacancy_weight: 2.0,
            affordability_weight: 1.0,
            supply_floor: 15.0,
            scale_factor: 8.0,
            prediction_jitter: 1.0,
        }
    }
}

impl ScoringWeights {
    /// Divisors and the supply floor must stay positive or the ratio is
    /// meaningless.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("migration_divisor", self.migration_divisor),
            ("consents_divisor", self.consents_divisor),
            ("days_divisor", self.days_divisor),
            ("sales_divisor", self.sales_divisor),
            ("supply_floor", self.supply_floor),
            ("scale_factor", self.scale_factor),
        ] {
            if value <= 0.0 {
                return Err(format!("{} must be positive, got {}", name, value));
            }
        }
        if self.prediction_jitter < 0.0 {
            return Err(format!(
                "prediction_jitter must be non-negative, got {}",
                self.prediction_jitter
            ));
        }
        Ok(())
    }
}
