// ============================================================================
// Entity Store - Relational persistence for customers, products and orders
// ============================================================================
//
// The domain layer only sees the traits declared here. `SqliteStore` is the
// one implementation, backed by an sqlx pool.
//
// Every read filters out soft-deleted rows. Every call runs under the
// store's deadline; a call that misses it is dropped, and dropping an open
// transaction rolls it back.
//
// ============================================================================

mod customers;
mod orders;
mod products;
mod schema;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::future::Future;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseSettings;
use crate::domain::order::OrderStatus;
use crate::models::{Customer, NewCustomer, NewOrder, NewProduct, Order, Product};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Stored value is corrupt: {0}")]
    Corrupt(String),

    #[error("Store call exceeded deadline of {0:?}")]
    Timeout(Duration),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return StoreError::Conflict(db_err.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

// ============================================================================
// Store Traits
// ============================================================================

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn insert_customer(&self, customer: NewCustomer) -> StoreResult<Customer>;
    async fn find_customer(&self, id: i64) -> StoreResult<Option<Customer>>;
    async fn find_customer_by_email(&self, email: &str) -> StoreResult<Option<Customer>>;
    async fn find_customer_by_national_id(&self, national_id: &str) -> StoreResult<Option<Customer>>;
    async fn list_customers(&self) -> StoreResult<Vec<Customer>>;
    async fn search_customers_by_name(&self, name: &str) -> StoreResult<Vec<Customer>>;
    async fn update_customer(&self, customer: &Customer) -> StoreResult<Customer>;
    /// Refused with `Conflict` while a live order references the customer.
    async fn delete_customer(&self, id: i64) -> StoreResult<()>;
    async fn count_customers(&self) -> StoreResult<i64>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product>;
    async fn find_product(&self, id: i64) -> StoreResult<Option<Product>>;
    async fn find_product_by_sku(&self, sku: &str) -> StoreResult<Option<Product>>;
    async fn list_products(&self) -> StoreResult<Vec<Product>>;
    async fn search_products_by_name(&self, name: &str) -> StoreResult<Vec<Product>>;
    async fn search_products_by_category(&self, category: &str) -> StoreResult<Vec<Product>>;
    async fn update_product(&self, product: &Product) -> StoreResult<Product>;
    /// Refused with `Conflict` while a live order line references the product.
    async fn delete_product(&self, id: i64) -> StoreResult<()>;
    async fn count_products(&self) -> StoreResult<i64>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Writes the order and all of its lines in one transaction and returns
    /// the new order id. Nothing is written if any statement fails.
    async fn create_order(&self, order: NewOrder) -> StoreResult<i64>;
    async fn find_order(&self, id: i64) -> StoreResult<Option<Order>>;
    async fn list_orders(&self) -> StoreResult<Vec<Order>>;
    async fn list_orders_by_customer(&self, customer_id: i64) -> StoreResult<Vec<Order>>;
    async fn list_orders_by_status(&self, status: OrderStatus) -> StoreResult<Vec<Order>>;
    async fn update_order_status(&self, id: i64, status: OrderStatus) -> StoreResult<()>;
    /// Soft-deletes the order together with its lines.
    async fn delete_order(&self, id: i64) -> StoreResult<()>;
    async fn count_orders(&self) -> StoreResult<i64>;
}

// ============================================================================
// SQLite Implementation
// ============================================================================

pub struct SqliteStore {
    pool: SqlitePool,
    deadline: Duration,
}

impl SqliteStore {
    /// Open the pool described by `settings` and make sure the schema exists.
    pub async fn connect(settings: &DatabaseSettings) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(&settings.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        if let Some(dir) = options.get_filename().parent() {
            ensure_dir(dir)?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(options)
            .await?;

        let store = Self::from_pool(pool, settings.request_timeout);
        store.migrate().await?;

        tracing::info!(url = %settings.url, "✅ Entity store ready");
        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in schema::STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::debug!(statements = schema::STATEMENTS.len(), "Schema applied");
        Ok(())
    }

    /// Run a store operation under the configured deadline.
    async fn bounded<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match tokio::time::timeout(self.deadline, op).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(deadline_ms = self.deadline.as_millis() as u64, "Store call timed out");
                Err(StoreError::Timeout(self.deadline))
            }
        }
    }
}

fn ensure_dir(dir: &Path) -> StoreResult<()> {
    if dir.as_os_str().is_empty() || dir.exists() {
        return Ok(());
    }
    std::fs::create_dir_all(dir)
        .map_err(|e| StoreError::Database(sqlx::Error::Io(e)))
}

pub(crate) fn parse_decimal(column: &str, raw: &str) -> StoreResult<Decimal> {
    Decimal::from_str(raw).map_err(|e| StoreError::Corrupt(format!("{}={:?}: {}", column, raw, e)))
}

/// Substring pattern for `LIKE ? ESCAPE '\'`; wildcards in `fragment`
/// match literally.
pub(crate) fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}


// ============================================================================
// Test Support
// ============================================================================
