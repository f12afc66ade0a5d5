use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::customer::CustomerError;
use crate::domain::order::OrderError;
use crate::domain::product::ProductError;
use crate::store::StoreError;

// ============================================================================
// API Error - one error type for every handler
// ============================================================================

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            status,
            body: ErrorBody { error: error.into(), message },
        }
    }

    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, Some(message.into()))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Resource not found", Some(message.into()))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "Conflict", Some(message.into()))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Operation failed", Some(message.into()))
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::bad_request("Invalid request", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body.message {
            Some(message) => write!(f, "{} ({}): {}", self.body.error, self.status, message),
            None => write!(f, "{} ({})", self.body.error, self.status),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        if self.status.is_server_error() {
            tracing::error!(status = self.status.as_u16(), "❌ {}", self);
        } else {
            tracing::debug!(status = self.status.as_u16(), "{}", self);
        }
        HttpResponse::build(self.status).json(&self.body)
    }
}

// ============================================================================
// Domain → HTTP mapping
// ============================================================================

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::not_found(err.to_string()),
            StoreError::Conflict(_) => ApiError::conflict(err.to_string()),
            StoreError::Corrupt(_) | StoreError::Timeout(_) | StoreError::Database(_) => {
                ApiError::internal(err.to_string())
            }
        }
    }
}

impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::Invalid(_) => ApiError::invalid(err.to_string()),
            CustomerError::NotFound(_) => ApiError::not_found(err.to_string()),
            CustomerError::Duplicate(_) | CustomerError::InUse(_) => ApiError::conflict(err.to_string()),
            CustomerError::Store(store) => store.into(),
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Invalid(_) => ApiError::invalid(err.to_string()),
            ProductError::NotFound(_) | ProductError::SkuNotFound(_) => ApiError::not_found(err.to_string()),
            ProductError::DuplicateSku(_) | ProductError::InUse(_) => ApiError::conflict(err.to_string()),
            ProductError::Store(store) => store.into(),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyItems
            | OrderError::InvalidQuantity(_)
            | OrderError::InvalidCustomerId(_)
            | OrderError::InvalidProductId(_)
            | OrderError::InvalidStatus(_)
            | OrderError::AmountOverflow => ApiError::invalid(err.to_string()),
            OrderError::CustomerNotFound(_) | OrderError::ProductNotFound(_) | OrderError::NotFound(_) => {
                ApiError::not_found(err.to_string())
            }
            // Business-rule refusals during creation keep the 500 clients already handle
            OrderError::InsufficientStock(_) | OrderError::ProductInactive(_) => {
                ApiError::internal(err.to_string())
            }
            OrderError::Store(store) => store.into(),
        }
    }
}
