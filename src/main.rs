//! Suburb Signal server
//!
//! Wires the entity catalog, source adapters, refresh orchestrator, cron
//! scheduler and HTTP surface into one process.

use dotenvy::dotenv;
use propsignal::adapters::{
    EconomicAdapter, EconomicDefaults, MarketAdapter, MarketDefaults, PopulationAdapter,
    PopulationDefaults, SourceAdapter, Upstream,
};
use propsignal::config;
use propsignal::core::http::{start_server, AppState};
use propsignal::core::orchestrator::RefreshOrchestrator;
use propsignal::core::scheduler::RefreshScheduler;
use propsignal::logging;
use propsignal::metrics::Metrics;
use propsignal::models::default_catalog;
use propsignal::scoring::{MetricsAggregator, ScoringWeights};
use propsignal::store::SuburbStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let env = config::get_environment();
    info!("Starting Suburb Signal server");
    info!(environment = %env, "Environment");

    let weights = ScoringWeights::default();
    weights.validate().map_err(|e| format!("invalid scoring weights: {}", e))?;

    let metrics = Arc::new(Metrics::new()?);
    let store = Arc::new(SuburbStore::new());

    // Production wiring uses a real entropy source; tests inject seeds.
    let mut population =
        PopulationAdapter::new(PopulationDefaults::default(), StdRng::from_entropy());
    if let Some(url) = config::get_population_api_url() {
        info!(url = %url, "population adapter upstream configured");
        population = population.with_upstream(Upstream::new(url)?);
    }
    let mut market = MarketAdapter::new(MarketDefaults::default(), StdRng::from_entropy());
    if let Some(url) = config::get_market_api_url() {
        info!(url = %url, "market adapter upstream configured");
        market = market.with_upstream(Upstream::new(url)?);
    }
    let mut economic = EconomicAdapter::new(EconomicDefaults::default(), StdRng::from_entropy());
    if let Some(url) = config::get_economic_api_url() {
        info!(url = %url, "economic adapter upstream configured");
        economic = economic.with_upstream(Upstream::new(url)?);
    }

    let adapters: Vec<Arc<dyn SourceAdapter>> =
        vec![Arc::new(population), Arc::new(market), Arc::new(economic)];

    let aggregator = MetricsAggregator::new(weights, StdRng::from_entropy());
    let pace = Duration::from_millis(config::get_entity_pace_ms());

    let orchestrator = Arc::new(RefreshOrchestrator::new(
        default_catalog(),
        adapters,
        aggregator,
        store.clone(),
        pace,
        Some(metrics.clone()),
    )?);

    let schedule = config::get_refresh_schedule();
    let scheduler = RefreshScheduler::new(orchestrator.clone(), &schedule)?;
    scheduler.start().await;
    info!(schedule = %schedule, "scheduled refresh active");

    if config::get_refresh_on_start() {
        let initial = orchestrator.clone();
        tokio::spawn(async move {
            info!("starting initial refresh cycle");
            match initial.run_cycle().await {
                Ok(report) => info!(
                    cycle_id = report.cycle_id,
                    succeeded = report.succeeded,
                    skipped = report.skipped,
                    "initial refresh completed"
                ),
                Err(e) => error!(error = %e, "initial refresh failed"),
            }
        });
    }

    let state = AppState {
        store: store.clone(),
        orchestrator: orchestrator.clone(),
        metrics: metrics.clone(),
        start_time: Arc::new(Instant::now()),
    };

    let port = config::get_port();
    let server = tokio::spawn(async move {
        if let Err(e) = start_server(port, state).await {
            error!(error = %e, "HTTP server exited");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            warn!("shutdown signal received");
            orchestrator.request_shutdown();
            scheduler.stop().await;
            server.abort();
            info!("server stopped");
        }
    }

    Ok(())
}
