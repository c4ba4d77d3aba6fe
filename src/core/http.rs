//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::core::orchestrator::RefreshOrchestrator;
use crate::error::CycleError;
use crate::metrics::Metrics;
use crate::store::SuburbStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SuburbStore>,
    pub orchestrator: Arc<RefreshOrchestrator>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
}

async fn index() -> Json<Value> {
    Json(json!({
        "message": "Suburb Signal API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/api/suburbs": "Get all suburbs",
            "/api/suburbs/{name}": "Get specific suburb",
            "/api/refresh": "Refresh data (POST)",
            "/api/health": "Health check",
            "/metrics": "Prometheus metrics"
        }
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let health = state.store.health().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Json(json!({
        "status": "healthy",
        "suburbs": health.count,
        "lastUpdate": health.last_updated,
        "uptimeSeconds": uptime_seconds,
        "timestamp": chrono::Utc::now(),
    }))
}

async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// List all suburb records, ordered by id.
async fn list_suburbs(State(state): State<AppState>) -> Json<Value> {
    let suburbs = state.store.list().await;
    info!(count = suburbs.len(), "serving {} suburbs", suburbs.len());
    Json(json!(suburbs))
}

/// Get a single suburb record by name.
async fn get_suburb(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.store.get(&name).await {
        Some(record) => Ok(Json(json!(record))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Suburb not found" })),
        )),
    }
}

/// Trigger an on-demand refresh cycle. Rejected with 409 while another cycle
/// is running.
async fn refresh(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    info!("manual refresh triggered");
    match state.orchestrator.run_cycle().await {
        Ok(report) => {
            let health = state.store.health().await;
            Ok(Json(json!({
                "success": true,
                "message": "Data refreshed successfully",
                "suburbs": health.count,
                "report": report,
            })))
        }
        Err(CycleError::Busy) => Err((
            StatusCode::CONFLICT,
            Json(json!({ "error": "A refresh cycle is already running" })),
        )),
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/suburbs", get(list_suburbs))
        .route("/api/suburbs/{name}", get(get_suburb))
        .route("/api/refresh", post(refresh))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
