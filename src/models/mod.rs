//! Shared data models spanning the engine layers.

pub mod entity;
pub mod metrics;

pub use entity::{default_catalog, validate_catalog, Classification, Entity};
pub use metrics::{
    CycleReport, EconomicFragment, MarketFragment, MetricsFragment, MetricsRecord,
    PopulationFragment, RiskLevel, SuburbRecord,
};
