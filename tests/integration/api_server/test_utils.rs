//! Test utilities for API server integration tests

use axum_test::TestServer;
use propsignal::adapters::{
    EconomicAdapter, EconomicDefaults, MarketAdapter, MarketDefaults, PopulationAdapter,
    PopulationDefaults, SourceAdapter,
};
use propsignal::core::http::{create_router, AppState};
use propsignal::core::orchestrator::RefreshOrchestrator;
use propsignal::metrics::Metrics;
use propsignal::models::{Classification, Entity};
use propsignal::scoring::{MetricsAggregator, ScoringWeights};
use propsignal::store::SuburbStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Test helper wiring a real orchestrator over seeded adapters behind the
/// HTTP surface.
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub store: Arc<SuburbStore>,
    pub orchestrator: Arc<RefreshOrchestrator>,
    pub metrics: Arc<Metrics>,
}

pub fn test_catalog() -> Vec<Entity> {
    vec![
        Entity::new("Ponsonby", "Auckland", "Auckland", Classification::Inner),
        Entity::new("Rolleston", "Canterbury", "Christchurch", Classification::Outer),
        Entity::new("Newtown", "Wellington", "Wellington", Classification::Inner),
    ]
}

impl TestApiServer {
    pub async fn new() -> Self {
        Self::with_entity_delay(Duration::ZERO).await
    }

    /// Slow variant: every population fetch sleeps, keeping a cycle in
    /// flight long enough to observe the busy rejection.
    pub async fn with_entity_delay(delay: Duration) -> Self {
        let rng = || StdRng::seed_from_u64(99);
        let population = SlowedPopulationAdapter {
            inner: PopulationAdapter::new(PopulationDefaults::default(), rng()),
            delay,
        };
        let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(population),
            Arc::new(MarketAdapter::new(MarketDefaults::default(), rng())),
            Arc::new(EconomicAdapter::new(EconomicDefaults::default(), rng())),
        ];

        let store = Arc::new(SuburbStore::new());
        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
        let aggregator = MetricsAggregator::new(ScoringWeights::default(), rng());
        let orchestrator = Arc::new(
            RefreshOrchestrator::new(
                test_catalog(),
                adapters,
                aggregator,
                store.clone(),
                Duration::ZERO,
                Some(metrics.clone()),
            )
            .expect("valid orchestrator configuration"),
        );

        let state = AppState {
            store: store.clone(),
            orchestrator: orchestrator.clone(),
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
        };

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self {
            server,
            store,
            orchestrator,
            metrics,
        }
    }
}

struct SlowedPopulationAdapter {
    inner: PopulationAdapter,
    delay: Duration,
}

#[async_trait::async_trait]
impl SourceAdapter for SlowedPopulationAdapter {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn field_names(&self) -> &'static [&'static str] {
        self.inner.field_names()
    }

    async fn fetch(
        &self,
        entity: &Entity,
    ) -> Result<propsignal::models::MetricsFragment, propsignal::error::AdapterError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.fetch(entity).await
    }
}
