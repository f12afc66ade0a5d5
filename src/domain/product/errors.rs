use crate::domain::validation::FieldError;
use crate::store::StoreError;

// ============================================================================
// Product Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Invalid product: {0}")]
    Invalid(#[from] FieldError),

    #[error("Product not found: {0}")]
    NotFound(i64),

    #[error("Product not found for SKU: {0}")]
    SkuNotFound(String),

    #[error("SKU already registered: {0}")]
    DuplicateSku(String),

    #[error("Product is still referenced: {0}")]
    InUse(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ProductError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => ProductError::NotFound(id),
            StoreError::Conflict(msg) => ProductError::DuplicateSku(msg),
            other => ProductError::Store(other),
        }
    }
}
