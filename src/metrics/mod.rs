// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::{health_handler, metrics_handler};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - HTTP traffic (requests by method/status, latency by method)
// - Order creation outcomes
// - Order status changes
//
// All metrics are registered with one Prometheus registry, scraped via
// GET /metrics on the main server.
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: IntCounterVec,
    pub http_request_duration: HistogramVec,

    // Order Metrics
    pub orders_created: IntCounter,
    pub order_creation_failures: IntCounterVec,
    pub order_status_updates: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // HTTP Metrics
        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests handled"),
            &["method", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["method"],
        )?;
        registry.register(Box::new(http_request_duration.clone()))?;

        // Order Metrics
        let orders_created = IntCounter::new("orders_created_total", "Total orders created")?;
        registry.register(Box::new(orders_created.clone()))?;

        let order_creation_failures = IntCounterVec::new(
            Opts::new("order_creation_failures_total", "Order creations refused or failed"),
            &["reason"],
        )?;
        registry.register(Box::new(order_creation_failures.clone()))?;

        let order_status_updates = IntCounterVec::new(
            Opts::new("order_status_updates_total", "Order status updates by target status"),
            &["status"],
        )?;
        registry.register(Box::new(order_status_updates.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration,
            orders_created,
            order_creation_failures,
            order_status_updates,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_http_request(&self, method: &str, status: u16, duration_secs: f64) {
        self.http_requests_total
            .with_label_values(&[method, &status.to_string()])
            .inc();
        self.http_request_duration.with_label_values(&[method]).observe(duration_secs);
    }

    /// Helper to record an order creation attempt
    pub fn record_order_created(&self, failure_reason: Option<&str>) {
        match failure_reason {
            None => self.orders_created.inc(),
            Some(reason) => self.order_creation_failures.with_label_values(&[reason]).inc(),
        }
    }

    pub fn record_status_update(&self, status: &str) {
        self.order_status_updates.with_label_values(&[status]).inc();
    }
}
