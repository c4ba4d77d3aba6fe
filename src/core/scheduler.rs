//! Cron-based scheduler for the daily refresh cycle.

use crate::core::orchestrator::RefreshOrchestrator;
use crate::error::{ConfigError, CycleError};
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Scheduler that periodically triggers a refresh cycle.
pub struct RefreshScheduler {
    orchestrator: Arc<RefreshOrchestrator>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl RefreshScheduler {
    /// Create a new scheduler from a second-resolution cron expression
    /// (e.g. `0 0 6 * * *` for daily at 06:00).
    pub fn new(
        orchestrator: Arc<RefreshOrchestrator>,
        cron_expr: &str,
    ) -> Result<Self, ConfigError> {
        let schedule = Schedule::from_str(cron_expr).map_err(|e| ConfigError::InvalidSchedule {
            expr: cron_expr.to_string(),
            source: e,
        })?;

        info!(cron = %cron_expr, "RefreshScheduler: created with schedule {}", cron_expr);

        Ok(Self {
            orchestrator,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the scheduler loop.
    pub async fn start(&self) {
        let orchestrator = self.orchestrator.clone();
        let schedule = self.schedule.clone();
        let handle_arc = self.handle.clone();

        let handle = tokio::spawn(async move {
            info!("RefreshScheduler: started, waiting for cron schedule...");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    // No more scheduled times, wait a bit and check again
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                info!("RefreshScheduler: cron tick, triggering refresh cycle");
                match orchestrator.run_cycle().await {
                    Ok(report) => {
                        info!(
                            cycle_id = report.cycle_id,
                            succeeded = report.succeeded,
                            skipped = report.skipped,
                            "RefreshScheduler: scheduled cycle completed"
                        );
                    }
                    Err(CycleError::Busy) => {
                        warn!("RefreshScheduler: a cycle is already running, skipping this tick");
                    }
                }
            }
        });

        {
            let mut h = handle_arc.write().await;
            if let Some(previous) = h.replace(handle) {
                error!("RefreshScheduler: start called twice, aborting previous loop");
                previous.abort();
            }
        }

        info!("RefreshScheduler: started successfully");
    }

    /// Stop the scheduler.
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("RefreshScheduler: stopped");
        }
    }

    /// Check if the scheduler is running.
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
