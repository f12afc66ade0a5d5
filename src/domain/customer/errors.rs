use crate::domain::validation::FieldError;
use crate::store::StoreError;

// ============================================================================
// Customer Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error("Invalid customer: {0}")]
    Invalid(#[from] FieldError),

    #[error("Customer not found: {0}")]
    NotFound(i64),

    #[error("Customer already registered: {0}")]
    Duplicate(String),

    #[error("Customer is still referenced: {0}")]
    InUse(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CustomerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => CustomerError::NotFound(id),
            StoreError::Conflict(msg) => CustomerError::Duplicate(msg),
            other => CustomerError::Store(other),
        }
    }
}
