//! Environment-based configuration.
//!
//! Every knob has a sensible default so the server starts with no
//! environment at all; upstream adapter endpoints are opt-in.

use std::env;

/// Deployment environment name. Controls the log formatter.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// HTTP listen port.
pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000)
}

/// Second-resolution cron expression for the scheduled refresh.
/// Defaults to daily at 06:00 UTC.
pub fn get_refresh_schedule() -> String {
    env::var("REFRESH_SCHEDULE").unwrap_or_else(|_| "0 0 6 * * *".to_string())
}

/// Delay between entities within one refresh cycle, in milliseconds.
pub fn get_entity_pace_ms() -> u64 {
    env::var("ENTITY_PACE_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(100)
}

/// Whether to kick off a refresh cycle at startup.
pub fn get_refresh_on_start() -> bool {
    env::var("REFRESH_ON_START")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(true)
}

/// Optional upstream base URL for the population adapter.
pub fn get_population_api_url() -> Option<String> {
    env::var("POPULATION_API_URL").ok().filter(|v| !v.is_empty())
}

/// Optional upstream base URL for the market adapter.
pub fn get_market_api_url() -> Option<String> {
    env::var("MARKET_API_URL").ok().filter(|v| !v.is_empty())
}

/// Optional upstream base URL for the economic adapter.
pub fn get_economic_api_url() -> Option<String> {
    env::var("ECONOMIC_API_URL").ok().filter(|v| !v.is_empty())
}
