use actix_web::{web, HttpResponse};

use super::errors::ApiError;
use super::projection::{project_all, CountResponse, CustomerResponse};
use super::AppState;
use crate::domain::customer::{CreateCustomer, UpdateCustomer};

// ============================================================================
// /api/v1/customers
// ============================================================================

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::post().to(create))
            .route("", web::get().to(list))
            // Fixed segments before /{id}
            .route("/count", web::get().to(count))
            .route("/name/{name}", web::get().to(find_by_name))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete)),
    );
}

async fn create(state: web::Data<AppState>, body: web::Json<CreateCustomer>) -> Result<HttpResponse, ApiError> {
    let customer = state.customers.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(CustomerResponse::from(customer)))
}

async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let customers = state.customers.list().await?;
    Ok(HttpResponse::Ok().json(project_all::<_, CustomerResponse>(customers)))
}

async fn count(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let count = state.customers.count().await?;
    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

async fn find_by_name(state: web::Data<AppState>, name: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let customers = state.customers.search_by_name(&name).await?;
    Ok(HttpResponse::Ok().json(project_all::<_, CustomerResponse>(customers)))
}

async fn get(state: web::Data<AppState>, id: web::Path<u32>) -> Result<HttpResponse, ApiError> {
    let customer = state.customers.get(i64::from(*id)).await?;
    Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}

async fn update(
    state: web::Data<AppState>,
    id: web::Path<u32>,
    body: web::Json<UpdateCustomer>,
) -> Result<HttpResponse, ApiError> {
    let customer = state.customers.update(i64::from(*id), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}

async fn delete(state: web::Data<AppState>, id: web::Path<u32>) -> Result<HttpResponse, ApiError> {
    state.customers.delete(i64::from(*id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
