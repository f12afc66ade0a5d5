use std::sync::Arc;

use super::commands::{CreateProduct, UpdateProduct};
use super::errors::ProductError;
use crate::models::Product;
use crate::store::{ProductStore, StoreError};

// ============================================================================
// Product Service
// ============================================================================

pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, request: CreateProduct) -> Result<Product, ProductError> {
        let product = request.validate()?;

        if self.store.find_product_by_sku(&product.sku).await?.is_some() {
            return Err(ProductError::DuplicateSku(product.sku));
        }

        let created = self.store.insert_product(product).await?;
        tracing::info!(product_id = created.id, sku = %created.sku, "✅ Product created");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Product, ProductError> {
        self.store
            .find_product(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    pub async fn get_by_sku(&self, sku: &str) -> Result<Product, ProductError> {
        self.store
            .find_product_by_sku(sku)
            .await?
            .ok_or_else(|| ProductError::SkuNotFound(sku.to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.store.list_products().await?)
    }

    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Product>, ProductError> {
        Ok(self.store.search_products_by_name(name).await?)
    }

    pub async fn search_by_category(&self, category: &str) -> Result<Vec<Product>, ProductError> {
        Ok(self.store.search_products_by_category(category).await?)
    }

    pub async fn update(&self, id: i64, request: UpdateProduct) -> Result<Product, ProductError> {
        request.validate()?;
        let mut product = self.get(id).await?;

        if let Some(sku) = request.new_sku() {
            if let Some(other) = self.store.find_product_by_sku(sku).await? {
                if other.id != id {
                    return Err(ProductError::DuplicateSku(sku.to_string()));
                }
            }
        }

        request.apply_to(&mut product);
        let updated = self.store.update_product(&product).await?;
        tracing::info!(product_id = id, "Product updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ProductError> {
        self.store.delete_product(id).await.map_err(|e| match e {
            StoreError::Conflict(msg) => ProductError::InUse(msg),
            other => other.into(),
        })?;
        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, ProductError> {
        Ok(self.store.count_products().await?)
    }
}
