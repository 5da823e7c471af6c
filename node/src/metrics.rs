//! # Prometheus Metrics
//!
//! Operational metrics for the farm service, scraped from `/metrics` on the
//! configured metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so
//! they do not collide with any default global registry consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

/// Holds all Prometheus metric handles for the node.
///
/// Clone-friendly (prometheus handles are Arc-backed) so it can be shared
/// across request handlers.
#[derive(Clone)]
pub struct NodeMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Total number of farms registered since startup.
    pub farms_registered_total: IntCounter,
    /// Total number of successful tokenisations (ledger assets created).
    pub tokenisations_total: IntCounter,
    /// Total number of tokenisation attempts that failed at the gateway.
    pub tokenisation_failures_total: IntCounter,
    /// Current number of farms in the registry.
    pub registered_farms: IntGauge,
    /// Latency of the full tokenise operation, gateway round trip included.
    pub gateway_latency_seconds: Histogram,
}

impl NodeMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("farm".into()), None)
            .expect("failed to create prometheus registry");

        let farms_registered_total = IntCounter::new(
            "farms_registered_total",
            "Total number of farms registered since startup",
        )
        .expect("metric creation");
        registry
            .register(Box::new(farms_registered_total.clone()))
            .expect("metric registration");

        let tokenisations_total = IntCounter::new(
            "tokenisations_total",
            "Total number of successful tokenisations",
        )
        .expect("metric creation");
        registry
            .register(Box::new(tokenisations_total.clone()))
            .expect("metric registration");

        let tokenisation_failures_total = IntCounter::new(
            "tokenisation_failures_total",
            "Total number of tokenisation attempts that failed at the ledger gateway",
        )
        .expect("metric creation");
        registry
            .register(Box::new(tokenisation_failures_total.clone()))
            .expect("metric registration");

        let registered_farms = IntGauge::new(
            "registered_farms",
            "Current number of farms in the registry",
        )
        .expect("metric creation");
        registry
            .register(Box::new(registered_farms.clone()))
            .expect("metric registration");

        let gateway_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "gateway_latency_seconds",
                "End-to-end tokenise latency in seconds, gateway round trip included",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )
        .expect("metric creation");
        registry
            .register(Box::new(gateway_latency_seconds.clone()))
            .expect("metric registration");

        Self {
            registry,
            farms_registered_total,
            tokenisations_total,
            tokenisation_failures_total,
            registered_farms,
            gateway_latency_seconds,
        }
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer).expect("prometheus output is valid utf-8"))
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<NodeMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
///
/// Returns HTTP 500 if encoding fails (should never happen in practice).
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
