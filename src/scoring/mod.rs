//! Metrics aggregation and composite scoring.

pub mod aggregator;
pub mod signal;
pub mod weights;

pub use aggregator::MetricsAggregator;
pub use signal::{prediction_12m, risk_level, signal_score};
pub use weights::ScoringWeights;
