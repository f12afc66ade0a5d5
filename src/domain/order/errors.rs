use crate::store::StoreError;

// ============================================================================
// Order Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order items cannot be empty")]
    EmptyItems,

    #[error("Invalid item quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Invalid customer id: {0}")]
    InvalidCustomerId(i64),

    #[error("Invalid product id: {0}")]
    InvalidProductId(i64),

    #[error("Invalid order status: {0:?}")]
    InvalidStatus(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(i64),

    #[error("Product {0} not found")]
    ProductNotFound(i64),

    #[error("Product is inactive: {0}")]
    ProductInactive(String),

    #[error("Insufficient stock for product: {0}")]
    InsufficientStock(String),

    #[error("Order amount exceeds the supported range")]
    AmountOverflow,

    #[error("Order not found: {0}")]
    NotFound(i64),

    #[error(transparent)]
    Store(StoreError),
}

impl OrderError {
    /// Short label used for the failure counter.
    pub fn reason(&self) -> &'static str {
        match self {
            OrderError::EmptyItems
            | OrderError::InvalidQuantity(_)
            | OrderError::InvalidCustomerId(_)
            | OrderError::InvalidProductId(_)
            | OrderError::InvalidStatus(_) => "validation",
            OrderError::AmountOverflow => "amount_overflow",
            OrderError::CustomerNotFound(_) => "customer_not_found",
            OrderError::ProductNotFound(_) => "product_not_found",
            OrderError::ProductInactive(_) => "product_inactive",
            OrderError::InsufficientStock(_) => "insufficient_stock",
            OrderError::NotFound(_) => "order_not_found",
            OrderError::Store(_) => "store",
        }
    }
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity: "order", id } => OrderError::NotFound(id),
            other => OrderError::Store(other),
        }
    }
}
