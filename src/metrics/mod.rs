//! Prometheus metrics for the HTTP surface and the refresh pipeline.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,

    // HTTP surface
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,

    // Refresh pipeline
    pub refresh_cycles_total: IntCounter,
    pub entities_processed_total: IntCounter,
    pub entities_skipped_total: IntCounter,
    pub cycle_duration_seconds: Histogram,
    pub store_suburbs: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests received")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;

        let refresh_cycles_total =
            IntCounter::new("refresh_cycles_total", "Completed refresh cycles")?;
        let entities_processed_total = IntCounter::new(
            "entities_processed_total",
            "Entities successfully published across all cycles",
        )?;
        let entities_skipped_total = IntCounter::new(
            "entities_skipped_total",
            "Entities skipped due to per-entity processing errors",
        )?;
        let cycle_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "cycle_duration_seconds",
            "Refresh cycle duration in seconds",
        ))?;
        let store_suburbs = IntGauge::new("store_suburbs", "Suburb records in the store")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(refresh_cycles_total.clone()))?;
        registry.register(Box::new(entities_processed_total.clone()))?;
        registry.register(Box::new(entities_skipped_total.clone()))?;
        registry.register(Box::new(cycle_duration_seconds.clone()))?;
        registry.register(Box::new(store_suburbs.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
            refresh_cycles_total,
            entities_processed_total,
            entities_skipped_total,
            cycle_duration_seconds,
            store_suburbs,
        })
    }

    /// Export all registered metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| prometheus::Error::Msg(format!("metrics not valid UTF-8: {}", e)))
    }
}
