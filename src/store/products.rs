use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{like_pattern, parse_decimal, ProductStore, SqliteStore, StoreError, StoreResult};
use crate::models::{NewProduct, Product};

const COLUMNS: &str = "id, name, description, price, stock, sku, category, active, created_at, updated_at";

pub(super) fn product_from_row(row: &SqliteRow) -> StoreResult<Product> {
    let price: String = row.try_get("price")?;
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: parse_decimal("price", &price)?,
        stock: row.try_get("stock")?,
        sku: row.try_get("sku")?,
        category: row.try_get("category")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl SqliteStore {
    async fn fetch_products(&self, filter: &str, bind: Option<&str>) -> StoreResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE {} deleted_at IS NULL ORDER BY id",
            COLUMNS, filter
        );
        let mut query = sqlx::query(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(product_from_row).collect()
    }
}

#[async_trait]
impl ProductStore for SqliteStore {
    async fn insert_product(&self, product: NewProduct) -> StoreResult<Product> {
        self.bounded(async {
            let now = Utc::now();
            let result = sqlx::query(
                "INSERT INTO products (name, description, price, stock, sku, category, active, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price.to_string())
            .bind(product.stock)
            .bind(&product.sku)
            .bind(&product.category)
            .bind(product.active)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

            let id = result.last_insert_rowid();
            tracing::debug!(product_id = id, sku = %product.sku, "Inserted product");

            Ok::<_, StoreError>(Product {
                id,
                name: product.name,
                description: product.description,
                price: product.price,
                stock: product.stock,
                sku: product.sku,
                category: product.category,
                active: product.active,
                created_at: now,
                updated_at: now,
            })
        })
        .await
    }

    async fn find_product(&self, id: i64) -> StoreResult<Option<Product>> {
        self.bounded(async {
            let sql = format!("SELECT {} FROM products WHERE id = ? AND deleted_at IS NULL", COLUMNS);
            let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
            row.as_ref().map(product_from_row).transpose()
        })
        .await
    }

    async fn find_product_by_sku(&self, sku: &str) -> StoreResult<Option<Product>> {
        self.bounded(async {
            let sql = format!("SELECT {} FROM products WHERE sku = ? AND deleted_at IS NULL", COLUMNS);
            let row = sqlx::query(&sql).bind(sku).fetch_optional(&self.pool).await?;
            row.as_ref().map(product_from_row).transpose()
        })
        .await
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.bounded(self.fetch_products("", None)).await
    }

    async fn search_products_by_name(&self, name: &str) -> StoreResult<Vec<Product>> {
        let pattern = like_pattern(name);
        self.bounded(self.fetch_products("name LIKE ? ESCAPE '\\' AND", Some(&pattern))).await
    }

    async fn search_products_by_category(&self, category: &str) -> StoreResult<Vec<Product>> {
        let pattern = like_pattern(category);
        self.bounded(self.fetch_products("category LIKE ? ESCAPE '\\' AND", Some(&pattern))).await
    }

    async fn update_product(&self, product: &Product) -> StoreResult<Product> {
        self.bounded(async {
            let now = Utc::now();
            let result = sqlx::query(
                "UPDATE products
                 SET name = ?, description = ?, price = ?, stock = ?, sku = ?, category = ?, active = ?, updated_at = ?
                 WHERE id = ? AND deleted_at IS NULL",
            )
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price.to_string())
            .bind(product.stock)
            .bind(&product.sku)
            .bind(&product.category)
            .bind(product.active)
            .bind(now)
            .bind(product.id)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound { entity: "product", id: product.id });
            }

            Ok(Product { updated_at: now, ..product.clone() })
        })
        .await
    }

    async fn delete_product(&self, id: i64) -> StoreResult<()> {
        self.bounded(async {
            let mut tx = self.pool.begin().await?;

            let exists: Option<i64> =
                sqlx::query_scalar("SELECT id FROM products WHERE id = ? AND deleted_at IS NULL")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if exists.is_none() {
                return Err(StoreError::NotFound { entity: "product", id });
            }

            let live_lines: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM order_lines l
                 JOIN orders o ON o.id = l.order_id
                 WHERE l.product_id = ? AND l.deleted_at IS NULL AND o.deleted_at IS NULL",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
            if live_lines > 0 {
                return Err(StoreError::Conflict(format!(
                    "product {} is referenced by {} order line(s)",
                    id, live_lines
                )));
            }

            sqlx::query("UPDATE products SET deleted_at = ? WHERE id = ?")
                .bind(Utc::now())
                .bind(id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            tracing::debug!(product_id = id, "Soft-deleted product");
            Ok(())
        })
        .await
    }

    async fn count_products(&self) -> StoreResult<i64> {
        self.bounded(async {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
            Ok::<_, StoreError>(count)
        })
        .await
    }
}
