//! Concurrent suburb store: the only shared mutable state in the engine.
//!
//! Publishes are atomic per key; readers always observe a fully-formed record
//! or the prior one. Ids are assigned monotonically at first insertion and
//! never change across refreshes, so identity is stable even when metrics are
//! replaced every cycle.

use crate::models::{Entity, MetricsRecord, SuburbRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreHealth {
    pub count: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Inner {
    records: HashMap<String, SuburbRecord>,
    next_id: u64,
}

#[derive(Default)]
pub struct SuburbStore {
    inner: RwLock<Inner>,
}

impl SuburbStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a completed record for an entity. Orchestrator-only. Returns
    /// the record's stable id.
    pub async fn publish(&self, entity: &Entity, metrics: MetricsRecord) -> u64 {
        let mut inner = self.inner.write().await;
        match inner.records.get_mut(&entity.name) {
            Some(existing) => {
                existing.current_metrics = metrics;
                existing.id
            }
            None => {
                inner.next_id += 1;
                let id = inner.next_id;
                inner.records.insert(
                    entity.name.clone(),
                    SuburbRecord {
                        id,
                        entity: entity.clone(),
                        current_metrics: metrics,
                    },
                );
                id
            }
        }
    }

    pub async fn get(&self, name: &str) -> Option<SuburbRecord> {
        let inner = self.inner.read().await;
        inner.records.get(name).cloned()
    }

    /// Point-in-time snapshot of all records, ordered by id.
    pub async fn list(&self) -> Vec<SuburbRecord> {
        let inner = self.inner.read().await;
        let mut records: Vec<SuburbRecord> = inner.records.values().cloned().collect();
        records.sort_by_key(|r| r.id);
        records
    }

    pub async fn health(&self) -> StoreHealth {
        let inner = self.inner.read().await;
        StoreHealth {
            count: inner.records.len(),
            last_updated: inner
                .records
                .values()
                .map(|r| r.current_metrics.last_updated)
                .max(),
        }
    }
}
