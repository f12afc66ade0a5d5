use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{like_pattern, CustomerStore, SqliteStore, StoreError, StoreResult};
use crate::models::{Customer, NewCustomer};

const COLUMNS: &str = "id, name, email, national_id, phone, created_at, updated_at";

pub(super) fn customer_from_row(row: &SqliteRow) -> StoreResult<Customer> {
    Ok(Customer {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        national_id: row.try_get("national_id")?,
        phone: row.try_get("phone")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl SqliteStore {
    async fn fetch_customers(&self, sql: &str, bind: Option<&str>) -> StoreResult<Vec<Customer>> {
        let mut query = sqlx::query(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(customer_from_row).collect()
    }

    async fn fetch_customer_by(&self, column: &str, value: &str) -> StoreResult<Option<Customer>> {
        let sql = format!(
            "SELECT {} FROM customers WHERE {} = ? AND deleted_at IS NULL",
            COLUMNS, column
        );
        let row = sqlx::query(&sql).bind(value).fetch_optional(&self.pool).await?;
        row.as_ref().map(customer_from_row).transpose()
    }
}

#[async_trait]
impl CustomerStore for SqliteStore {
    async fn insert_customer(&self, customer: NewCustomer) -> StoreResult<Customer> {
        self.bounded(async {
            let now = Utc::now();
            let result = sqlx::query(
                "INSERT INTO customers (name, email, national_id, phone, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(&customer.national_id)
            .bind(&customer.phone)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

            let id = result.last_insert_rowid();
            tracing::debug!(customer_id = id, "Inserted customer");

            Ok::<_, StoreError>(Customer {
                id,
                name: customer.name,
                email: customer.email,
                national_id: customer.national_id,
                phone: customer.phone,
                created_at: now,
                updated_at: now,
            })
        })
        .await
    }

    async fn find_customer(&self, id: i64) -> StoreResult<Option<Customer>> {
        self.bounded(async {
            let sql = format!("SELECT {} FROM customers WHERE id = ? AND deleted_at IS NULL", COLUMNS);
            let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
            row.as_ref().map(customer_from_row).transpose()
        })
        .await
    }

    async fn find_customer_by_email(&self, email: &str) -> StoreResult<Option<Customer>> {
        self.bounded(self.fetch_customer_by("email", email)).await
    }

    async fn find_customer_by_national_id(&self, national_id: &str) -> StoreResult<Option<Customer>> {
        self.bounded(self.fetch_customer_by("national_id", national_id)).await
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let sql = format!("SELECT {} FROM customers WHERE deleted_at IS NULL ORDER BY id", COLUMNS);
        self.bounded(self.fetch_customers(&sql, None)).await
    }

    async fn search_customers_by_name(&self, name: &str) -> StoreResult<Vec<Customer>> {
        let sql = format!(
            "SELECT {} FROM customers WHERE name LIKE ? ESCAPE '\\' AND deleted_at IS NULL ORDER BY id",
            COLUMNS
        );
        let pattern = like_pattern(name);
        self.bounded(self.fetch_customers(&sql, Some(&pattern))).await
    }

    async fn update_customer(&self, customer: &Customer) -> StoreResult<Customer> {
        self.bounded(async {
            let now = Utc::now();
            let result = sqlx::query(
                "UPDATE customers SET name = ?, email = ?, national_id = ?, phone = ?, updated_at = ?
                 WHERE id = ? AND deleted_at IS NULL",
            )
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(&customer.national_id)
            .bind(&customer.phone)
            .bind(now)
            .bind(customer.id)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound { entity: "customer", id: customer.id });
            }

            Ok(Customer { updated_at: now, ..customer.clone() })
        })
        .await
    }

    async fn delete_customer(&self, id: i64) -> StoreResult<()> {
        self.bounded(async {
            let mut tx = self.pool.begin().await?;

            let exists: Option<i64> =
                sqlx::query_scalar("SELECT id FROM customers WHERE id = ? AND deleted_at IS NULL")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if exists.is_none() {
                return Err(StoreError::NotFound { entity: "customer", id });
            }

            let live_orders: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM orders WHERE customer_id = ? AND deleted_at IS NULL",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
            if live_orders > 0 {
                return Err(StoreError::Conflict(format!(
                    "customer {} is referenced by {} order(s)",
                    id, live_orders
                )));
            }

            sqlx::query("UPDATE customers SET deleted_at = ? WHERE id = ?")
                .bind(Utc::now())
                .bind(id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            tracing::debug!(customer_id = id, "Soft-deleted customer");
            Ok(())
        })
        .await
    }

    async fn count_customers(&self) -> StoreResult<i64> {
        self.bounded(async {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
            Ok::<_, StoreError>(count)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{memory_store, new_customer};

    #[tokio::test]
    async fn test_insert_and_find_customer() {
        let store = memory_store().await;

        let created = store.insert_customer(new_customer(1)).await.unwrap();
        let found = store.find_customer(created.id).await.unwrap().unwrap();

        assert_eq!(found.name, "Customer 1");
        assert_eq!(found.email, "customer1@example.com");
        assert_eq!(found.national_id, "00000000001");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let store = memory_store().await;
        store.insert_customer(new_customer(1)).await.unwrap();

        let mut duplicate = new_customer(2);
        duplicate.email = "customer1@example.com".to_string();

        let result = store.insert_customer(duplicate).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_search_by_name_is_substring_match() {
        let store = memory_store().await;
        let mut maria = new_customer(1);
        maria.name = "Maria Silva".to_string();
        let mut joao = new_customer(2);
        joao.name = "Joao Souza".to_string();
        store.insert_customer(maria).await.unwrap();
        store.insert_customer(joao).await.unwrap();

        let found = store.search_customers_by_name("Silv").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Maria Silva");
    }

    #[tokio::test]
    async fn test_soft_delete_hides_customer() {
        let store = memory_store().await;
        let created = store.insert_customer(new_customer(1)).await.unwrap();

        store.delete_customer(created.id).await.unwrap();

        assert!(store.find_customer(created.id).await.unwrap().is_none());
        assert_eq!(store.count_customers().await.unwrap(), 0);

        let row_still_there: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(row_still_there, 1);
    }

    #[tokio::test]
    async fn test_delete_missing_customer_is_not_found() {
        let store = memory_store().await;
        let result = store.delete_customer(42).await;
        assert!(matches!(result, Err(StoreError::NotFound { id: 42, .. })));
    }

    #[tokio::test]
    async fn test_update_missing_customer_is_not_found() {
        let store = memory_store().await;
        let mut ghost = store.insert_customer(new_customer(1)).await.unwrap();
        ghost.id = 99;

        let result = store.update_customer(&ghost).await;
        assert!(matches!(result, Err(StoreError::NotFound { id: 99, .. })));
    }
}
