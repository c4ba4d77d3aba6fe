//! Integration tests for adapter upstreams: real payloads are used when the
//! endpoint answers, and any failure degrades to the regional defaults.

use propsignal::adapters::{
    Band, CountRange, MarketAdapter, MarketDefaults, PopulationAdapter, PopulationDefaults,
    SourceAdapter, Upstream,
};
use propsignal::models::{Classification, Entity, MetricsFragment};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn rng() -> StdRng {
    StdRng::seed_from_u64(3)
}

fn auckland() -> Entity {
    Entity::new("Ponsonby", "Auckland", "Auckland", Classification::Inner)
}

fn deterministic_population() -> PopulationDefaults {
    PopulationDefaults {
        growth_jitter: 0.0,
        migration_range: CountRange::new(30, 30),
        population_span: 0,
        ..PopulationDefaults::default()
    }
}

fn deterministic_market() -> MarketDefaults {
    MarketDefaults {
        price_jitter: 0.0,
        days_jitter: 0.0,
        sales_range: CountRange::new(90, 90),
        vacancy: Band::new(2.0, 0.0),
        ..MarketDefaults::default()
    }
}

#[tokio::test]
async fn population_adapter_uses_upstream_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/population"))
        .and(query_param("authority", "Auckland"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "growth": 3.3, "total": 61000.0 })),
        )
        .mount(&server)
        .await;

    let adapter = PopulationAdapter::new(deterministic_population(), rng())
        .with_upstream(Upstream::new(server.uri()).unwrap());

    match adapter.fetch(&auckland()).await.unwrap() {
        MetricsFragment::Population(p) => {
            assert_eq!(p.population_growth, 3.3);
            assert_eq!(p.total_population, 61_000);
        }
        other => panic!("expected population fragment, got {:?}", other),
    }
}

#[tokio::test]
async fn upstream_failure_is_retried_then_degrades_to_defaults() {
    let server = MockServer::start().await;
    // Initial attempt plus two retries, then fallback.
    Mock::given(method("GET"))
        .and(path("/population"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let adapter = PopulationAdapter::new(deterministic_population(), rng())
        .with_upstream(Upstream::new(server.uri()).unwrap());

    match adapter.fetch(&auckland()).await.unwrap() {
        MetricsFragment::Population(p) => {
            // Auckland's regional default, not an error.
            assert_eq!(p.population_growth, 2.5);
        }
        other => panic!("expected population fragment, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_upstream_payload_degrades_to_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/market"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let adapter = MarketAdapter::new(deterministic_market(), rng())
        .with_upstream(Upstream::new(server.uri()).unwrap());

    match adapter.fetch(&auckland()).await.unwrap() {
        MetricsFragment::Market(m) => {
            assert_eq!(m.median_price, 990_000.0);
            assert_eq!(m.days_on_market, 48.0);
        }
        other => panic!("expected market fragment, got {:?}", other),
    }
}

#[tokio::test]
async fn market_adapter_combines_upstream_prices_with_derived_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/market"))
        .and(query_param("region", "Auckland"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "medianPrice": 1_050_000.0, "daysOnMarket": 41.0 })),
        )
        .mount(&server)
        .await;

    let adapter = MarketAdapter::new(deterministic_market(), rng())
        .with_upstream(Upstream::new(server.uri()).unwrap());

    match adapter.fetch(&auckland()).await.unwrap() {
        MetricsFragment::Market(m) => {
            assert_eq!(m.median_price, 1_050_000.0);
            assert_eq!(m.days_on_market, 41.0);
            // Sales and vacancy are still derived locally.
            assert_eq!(m.sales_volume, 90);
            assert_eq!(m.rental_vacancy, 2.0);
        }
        other => panic!("expected market fragment, got {:?}", other),
    }
}
