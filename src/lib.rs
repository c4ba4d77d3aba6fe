//! Suburb signal aggregation engine.
//!
//! Periodically fans out to pluggable data sources per suburb, merges their
//! fragments into a composite signal score and risk classification, and
//! publishes the results into a queryable in-memory store under a refresh
//! protocol that runs on a daily schedule or on demand.

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod scoring;
pub mod store;
