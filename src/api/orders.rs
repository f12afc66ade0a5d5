use actix_web::{web, HttpResponse};

use super::errors::ApiError;
use super::projection::{project_all, CountResponse, OrderResponse};
use super::AppState;
use crate::domain::order::{CreateOrder, UpdateOrderStatus};

// ============================================================================
// /api/v1/orders
// ============================================================================

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(create))
            .route("", web::get().to(list))
            // Fixed segments before /{id}
            .route("/count", web::get().to(count))
            .route("/customer/{customer_id}", web::get().to(find_by_customer))
            .route("/status/{status}", web::get().to(find_by_status))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update_status))
            .route("/{id}", web::delete().to(delete)),
    );
}

async fn create(state: web::Data<AppState>, body: web::Json<CreateOrder>) -> Result<HttpResponse, ApiError> {
    match state.orders.create(body.into_inner()).await {
        Ok(order) => {
            state.metrics.record_order_created(None);
            Ok(HttpResponse::Created().json(OrderResponse::from(order)))
        }
        Err(e) => {
            state.metrics.record_order_created(Some(e.reason()));
            tracing::warn!(reason = e.reason(), "Order creation refused: {}", e);
            Err(e.into())
        }
    }
}

async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let orders = state.orders.list().await?;
    Ok(HttpResponse::Ok().json(project_all::<_, OrderResponse>(orders)))
}

async fn count(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let count = state.orders.count().await?;
    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

async fn find_by_customer(
    state: web::Data<AppState>,
    customer_id: web::Path<u32>,
) -> Result<HttpResponse, ApiError> {
    let orders = state.orders.list_by_customer(i64::from(*customer_id)).await?;
    Ok(HttpResponse::Ok().json(project_all::<_, OrderResponse>(orders)))
}

async fn find_by_status(state: web::Data<AppState>, status: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let orders = state.orders.list_by_status(&status).await?;
    Ok(HttpResponse::Ok().json(project_all::<_, OrderResponse>(orders)))
}

async fn get(state: web::Data<AppState>, id: web::Path<u32>) -> Result<HttpResponse, ApiError> {
    let order = state.orders.get(i64::from(*id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

async fn update_status(
    state: web::Data<AppState>,
    id: web::Path<u32>,
    body: web::Json<UpdateOrderStatus>,
) -> Result<HttpResponse, ApiError> {
    let order = state.orders.update_status(i64::from(*id), body.into_inner()).await?;
    state.metrics.record_status_update(order.status.as_str());
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

async fn delete(state: web::Data<AppState>, id: web::Path<u32>) -> Result<HttpResponse, ApiError> {
    state.orders.delete(i64::from(*id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
