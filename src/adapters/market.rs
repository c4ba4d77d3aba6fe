//! Housing market adapter: prices, liquidity and vacancy by region.

use crate::adapters::{Band, CountRange, SourceAdapter, Upstream};
use crate::error::AdapterError;
use crate::models::{Entity, MarketFragment, MetricsFragment};
use async_trait::async_trait;
use rand::rngs::StdRng;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::warn;

const FIELDS: &[&str] = &["medianPrice", "daysOnMarket", "salesVolume", "rentalVacancy"];

/// Regional base estimates for the market source.
#[derive(Debug, Clone, Copy)]
pub struct MarketBase {
    pub median_price: f64,
    pub days_on_market: f64,
}

/// Fallback tables and derivation bands for the market adapter.
#[derive(Debug, Clone)]
pub struct MarketDefaults {
    pub by_region: HashMap<String, MarketBase>,
    pub global: MarketBase,
    pub price_jitter: f64,
    pub days_jitter: f64,
    pub sales_range: CountRange,
    pub vacancy: Band,
    pub vacancy_min: f64,
    pub vacancy_max: f64,
}

impl Default for MarketDefaults {
    fn default() -> Self {
        let by_region = [
            ("Auckland", 990_000.0, 48.0),
            ("Wellington", 800_000.0, 55.0),
            ("Canterbury", 695_000.0, 42.0),
            ("Bay of Plenty", 820_000.0, 46.0),
            ("Waikato", 720_000.0, 44.0),
            ("Otago", 650_000.0, 52.0),
            ("Manawatu-Whanganui", 580_000.0, 48.0),
            ("Taranaki", 540_000.0, 48.0),
            ("Northland", 620_000.0, 51.0),
            ("Hawke's Bay", 650_000.0, 47.0),
            ("Nelson", 780_000.0, 49.0),
        ]
        .into_iter()
        .map(|(region, median_price, days_on_market)| {
            (
                region.to_string(),
                MarketBase {
                    median_price,
                    days_on_market,
                },
            )
        })
        .collect();

        Self {
            by_region,
            global: MarketBase {
                median_price: 700_000.0,
                days_on_market: 50.0,
            },
            price_jitter: 25_000.0,
            days_jitter: 5.0,
            sales_range: CountRange::new(40, 140),
            vacancy: Band::new(2.0, 0.5),
            vacancy_min: 0.5,
            vacancy_max: 6.0,
        }
    }
}

/// Upstream payload for market statistics.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketUpstream {
    median_price: f64,
    days_on_market: f64,
}

pub struct MarketAdapter {
    defaults: MarketDefaults,
    upstream: Option<Upstream>,
    rng: Mutex<StdRng>,
}

impl MarketAdapter {
    pub fn new(defaults: MarketDefaults, rng: StdRng) -> Self {
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

    fn base_for(&self, entity: &Entity) -> MarketBase {
        self.defaults
            .by_region
            .get(&entity.region)
            .copied()
            .unwrap_or(self.defaults.global)
    }

    fn build(&self, median_price: f64, days_on_market: f64) -> MarketFragment {
        let mut rng = self.rng.lock().expect("market rng poisoned");
        let d = &self.defaults;
        MarketFragment {
            median_price,
            days_on_market,
            sales_volume: d.sales_range.sample(&mut rng).max(0) as u32,
            rental_vacancy: d
                .vacancy
                .sample(&mut rng)
                .clamp(d.vacancy_min, d.vacancy_max),
        }
    }

    fn fallback(&self, entity: &Entity) -> MarketFragment {
        let base = self.base_for(entity);
        let (price, days) = {
            let mut rng = self.rng.lock().expect("market rng poisoned");
            (
                Band::new(base.median_price, self.defaults.price_jitter).sample(&mut rng),
                Band::new(base.days_on_market, self.defaults.days_jitter)
                    .sample(&mut rng)
                    .max(1.0),
            )
        };
        self.build(price, days)
    }
}

#[async_trait]
impl SourceAdapter for MarketAdapter {
    fn name(&self) -> &'static str {
        "market"
    }

    fn field_names(&self) -> &'static [&'static str] {
        FIELDS
    }

    async fn fetch(&self, entity: &Entity) -> Result<MetricsFragment, AdapterError> {
        if let Some(upstream) = &self.upstream {
            match upstream
                .get_json::<MarketUpstream>("market", &[("region", &entity.region)])
                .await
            {
                Ok(data) => {
                    return Ok(MetricsFragment::Market(
                        self.build(data.median_price, data.days_on_market.max(1.0)),
                    ));
                }
                Err(e) => {
                    warn!(
                        suburb = %entity.name,
                        region = %entity.region,
                        error = %e,
                        "market upstream failed, using regional defaults"
                    );
                }
            }
        }
        Ok(MetricsFragment::Market(self.fallback(entity)))
    }
}
