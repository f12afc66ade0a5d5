use actix_web::{web, HttpResponse};

use super::errors::ApiError;
use super::projection::{project_all, CountResponse, ProductResponse};
use super::AppState;
use crate::domain::product::{CreateProduct, UpdateProduct};

// ============================================================================
// /api/v1/products
// ============================================================================

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::post().to(create))
            .route("", web::get().to(list))
            // Fixed segments before /{id}
            .route("/count", web::get().to(count))
            .route("/name/{name}", web::get().to(find_by_name))
            .route("/category/{category}", web::get().to(find_by_category))
            .route("/sku/{sku}", web::get().to(find_by_sku))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete)),
    );
}

async fn create(state: web::Data<AppState>, body: web::Json<CreateProduct>) -> Result<HttpResponse, ApiError> {
    let product = state.products.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let products = state.products.list().await?;
    Ok(HttpResponse::Ok().json(project_all::<_, ProductResponse>(products)))
}

async fn count(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let count = state.products.count().await?;
    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

async fn find_by_name(state: web::Data<AppState>, name: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let products = state.products.search_by_name(&name).await?;
    Ok(HttpResponse::Ok().json(project_all::<_, ProductResponse>(products)))
}

async fn find_by_category(
    state: web::Data<AppState>,
    category: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let products = state.products.search_by_category(&category).await?;
    Ok(HttpResponse::Ok().json(project_all::<_, ProductResponse>(products)))
}

async fn find_by_sku(state: web::Data<AppState>, sku: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let product = state.products.get_by_sku(&sku).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

async fn get(state: web::Data<AppState>, id: web::Path<u32>) -> Result<HttpResponse, ApiError> {
    let product = state.products.get(i64::from(*id)).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

async fn update(
    state: web::Data<AppState>,
    id: web::Path<u32>,
    body: web::Json<UpdateProduct>,
) -> Result<HttpResponse, ApiError> {
    let product = state.products.update(i64::from(*id), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

async fn delete(state: web::Data<AppState>, id: web::Path<u32>) -> Result<HttpResponse, ApiError> {
    state.products.delete(i64::from(*id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
