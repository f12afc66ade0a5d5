use actix_cors::Cors;
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::middleware::Next;
use actix_web::{web, Error, ResponseError};
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::errors::ApiError;
use crate::metrics::Metrics;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tags every response with a request id, logs the exchange and feeds the
/// HTTP metrics. A caller-supplied `x-request-id` is kept.
pub async fn observe_request(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = req.method().to_string();
    let path = req.path().to_owned();
    let metrics = req.app_data::<web::Data<Arc<Metrics>>>().cloned();

    let started = Instant::now();
    let mut res = next.call(req).await?;
    let elapsed = started.elapsed();
    let status = res.status().as_u16();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        res.headers_mut().insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    if let Some(metrics) = metrics {
        metrics.record_http_request(&method, status, elapsed.as_secs_f64());
    }

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status,
        duration_ms = elapsed.as_millis() as u64,
        "Request handled"
    );

    Ok(res)
}

/// Cross-origin policy: any http(s) origin, the verbs the API serves, and
/// preflight answers cached for five minutes. Credentials are never allowed.
pub fn cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|origin, _head| {
            origin
                .to_str()
                .map(|o| o.starts_with("http://") || o.starts_with("https://"))
                .unwrap_or(false)
        })
        .allowed_methods(["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .expose_headers([header::LINK])
        .max_age(300)
}

/// Turns a panic anywhere below into a 500 with the usual error body, so the
/// client never sees a dropped connection.
pub async fn recover_panics(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let http_req = req.request().clone();

    match AssertUnwindSafe(next.call(req)).catch_unwind().await {
        Ok(res) => res.map(ServiceResponse::map_into_boxed_body),
        Err(payload) => {
            tracing::error!(
                method = %http_req.method(),
                path = %http_req.path(),
                panic = %panic_message(payload.as_ref()),
                "❌ Handler panicked"
            );
            let res = ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
                .error_response();
            Ok(ServiceResponse::new(http_req, res))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
