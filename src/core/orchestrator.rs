//! Refresh orchestrator: drives one full cycle over the entity catalog.
//!
//! At most one cycle runs at a time; a refresh request arriving while one is
//! active is rejected with `CycleError::Busy`, never silently queued. Within
//! a cycle, all adapters for one entity run concurrently; entities are paced
//! by a fixed inter-entity delay. Per-entity failures are logged and skipped,
//! they never abort the remaining entities.

use crate::adapters::{validate_field_disjointness, SourceAdapter};
use crate::error::{ConfigError, CycleError, EntityError};
use crate::metrics::Metrics;
use crate::models::{validate_catalog, CycleReport, Entity};
use crate::core::pacer::Pacer;
use crate::scoring::MetricsAggregator;
use crate::store::SuburbStore;
use chrono::Utc;
use futures_util::future::join_all;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub struct RefreshOrchestrator {
    catalog: Vec<Entity>,
    adapters: Vec<Arc<dyn SourceAdapter>>,
    aggregator: MetricsAggregator,
    store: Arc<SuburbStore>,
    pace: Duration,
    metrics: Option<Arc<Metrics>>,
    cycle_lock: Mutex<()>,
    cycle_seq: AtomicU64,
    shutdown: AtomicBool,
}

impl RefreshOrchestrator {
    /// Build the orchestrator, running the startup-time configuration
    /// validation: duplicate catalog names and fragment field collisions are
    /// fatal here, never at per-cycle runtime.
    pub fn new(
        catalog: Vec<Entity>,
        adapters: Vec<Arc<dyn SourceAdapter>>,
        aggregator: MetricsAggregator,
        store: Arc<SuburbStore>,
        pace: Duration,
        metrics: Option<Arc<Metrics>>,
    ) -> Result<Self, ConfigError> {
        validate_catalog(&catalog)?;
        validate_field_disjointness(&adapters)?;

        Ok(Self {
            catalog,
            adapters,
            aggregator,
            store,
            pace,
            metrics,
            cycle_lock: Mutex::new(()),
            cycle_seq: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        })
    }

    pub fn store(&self) -> &Arc<SuburbStore> {
        &self.store
    }

    /// Request cooperative cancellation: an in-flight cycle stops before its
    /// next entity. Per-entity publish is atomic, so cancellation only loses
    /// not-yet-reached entities.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Run one full refresh cycle. Trigger-agnostic: callable from the cron
    /// scheduler, the HTTP surface or startup wiring alike.
    pub async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let _guard = self.cycle_lock.try_lock().map_err(|_| CycleError::Busy)?;

        let cycle_id = self.cycle_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Instant::now();
        let mut pacer = Pacer::new(self.pace);
        let mut attempted = 0;
        let mut succeeded = 0;
        let mut skipped = 0;

        info!(
            cycle_id,
            entities = self.catalog.len(),
            "starting refresh cycle {}",
            cycle_id
        );

        for entity in &self.catalog {
            if self.shutdown.load(Ordering::SeqCst) {
                warn!(
                    cycle_id,
                    attempted, "shutdown requested, stopping cycle early"
                );
                break;
            }
            pacer.pace().await;
            attempted += 1;

            match self.process_entity(entity, cycle_id).await {
                Ok(()) => {
                    succeeded += 1;
                    if let Some(ref m) = self.metrics {
                        m.entities_processed_total.inc();
                    }
                }
                Err(e) => {
                    // Keeps the previous store record for this entity intact.
                    error!(
                        cycle_id,
                        suburb = %entity.name,
                        error = %e,
                        "skipping entity for this cycle"
                    );
                    skipped += 1;
                    if let Some(ref m) = self.metrics {
                        m.entities_skipped_total.inc();
                    }
                }
            }
        }

        let duration = started.elapsed();
        if let Some(ref m) = self.metrics {
            m.refresh_cycles_total.inc();
            m.cycle_duration_seconds.observe(duration.as_secs_f64());
            m.store_suburbs.set(self.store.health().await.count as i64);
        }

        let report = CycleReport {
            cycle_id,
            attempted,
            succeeded,
            skipped,
            duration_ms: duration.as_millis() as u64,
            completed_at: Utc::now(),
        };
        info!(
            cycle_id,
            succeeded,
            skipped,
            duration_ms = report.duration_ms,
            "refresh cycle {} completed",
            cycle_id
        );
        Ok(report)
    }

    /// Fan out all adapters for one entity, merge and publish atomically.
    async fn process_entity(&self, entity: &Entity, cycle_id: u64) -> Result<(), EntityError> {
        let fetches = self.adapters.iter().map(|adapter| adapter.fetch(entity));
        let results = join_all(fetches).await;

        let mut fragments = Vec::with_capacity(results.len());
        for result in results {
            fragments.push(result?);
        }

        let record = self.aggregator.merge(fragments, cycle_id, Utc::now())?;
        self.store.publish(entity, record).await;
        Ok(())
    }
}
