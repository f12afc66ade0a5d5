// ============================================================================
// HTTP API - actix-web surface under /api/v1
// ============================================================================
//
// Handlers only decode requests, call a domain service and project the
// result. Every failure leaves through `ApiError`.
//
// ============================================================================

mod customers;
mod errors;
mod middleware;
mod orders;
mod products;
pub mod projection;

use actix_web::web;
use std::sync::Arc;

use crate::domain::customer::CustomerService;
use crate::domain::order::OrderService;
use crate::domain::product::ProductService;
use crate::metrics::{self, Metrics};
use crate::store::SqliteStore;

pub use errors::ApiError;
pub use middleware::{cors, observe_request, recover_panics};

/// Shared per-app state: one service per aggregate, all over the same store.
pub struct AppState {
    pub customers: CustomerService,
    pub products: ProductService,
    pub orders: OrderService,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(store: Arc<SqliteStore>, metrics: Arc<Metrics>) -> Self {
        Self {
            customers: CustomerService::new(store.clone()),
            products: ProductService::new(store.clone()),
            orders: OrderService::new(store.clone(), store.clone(), store),
            metrics,
        }
    }
}

/// Extractor configs, API routes, health and metrics.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::bad_request("Invalid request body", err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::bad_request("Invalid path parameter", err.to_string()).into()),
    )
    .service(
        web::scope("/api/v1")
            .configure(customers::routes)
            .configure(products::routes)
            .configure(orders::routes),
    )
    .route("/health", web::get().to(metrics::health_handler))
    .route("/metrics", web::get().to(metrics::metrics_handler));
}
