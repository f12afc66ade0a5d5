use async_trait::async_trait;
use chrono::Utc;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::Row;
use std::collections::HashMap;
use std::str::FromStr;

use super::customers::customer_from_row;
use super::{parse_decimal, OrderStore, SqliteStore, StoreError, StoreResult};
use crate::domain::order::OrderStatus;
use crate::models::{Customer, NewOrder, Order, OrderLine, Product};

const ORDER_COLUMNS: &str = "id, customer_id, total_value, status, ordered_at, created_at, updated_at";

// Lines come back LEFT-joined to their product; a product that no longer
// resolves leaves every p_* column NULL. Callers append the `order_id`
// predicate.
const LINE_SELECT: &str = "
    SELECT l.id, l.order_id, l.product_id, l.quantity, l.unit_price, l.subtotal,
           p.id AS p_id, p.name AS p_name, p.description AS p_description,
           p.price AS p_price, p.stock AS p_stock, p.sku AS p_sku,
           p.category AS p_category, p.active AS p_active,
           p.created_at AS p_created_at, p.updated_at AS p_updated_at
    FROM order_lines l
    LEFT JOIN products p ON p.id = l.product_id AND p.deleted_at IS NULL
    WHERE l.deleted_at IS NULL AND l.order_id";

const CUSTOMER_SELECT: &str = "
    SELECT id, name, email, national_id, phone, created_at, updated_at
    FROM customers WHERE deleted_at IS NULL AND id";

fn line_from_row(row: &SqliteRow) -> StoreResult<OrderLine> {
    let unit_price: String = row.try_get("unit_price")?;
    let subtotal: String = row.try_get("subtotal")?;

    let product_id: Option<i64> = row.try_get("p_id")?;
    let product = match product_id {
        Some(id) => {
            let price: String = row.try_get("p_price")?;
            Some(Product {
                id,
                name: row.try_get("p_name")?,
                description: row.try_get("p_description")?,
                price: parse_decimal("p_price", &price)?,
                stock: row.try_get("p_stock")?,
                sku: row.try_get("p_sku")?,
                category: row.try_get("p_category")?,
                active: row.try_get("p_active")?,
                created_at: row.try_get("p_created_at")?,
                updated_at: row.try_get("p_updated_at")?,
            })
        }
        None => None,
    };

    Ok(OrderLine {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        product_id: row.try_get("product_id")?,
        product,
        quantity: row.try_get("quantity")?,
        unit_price: parse_decimal("unit_price", &unit_price)?,
        subtotal: parse_decimal("subtotal", &subtotal)?,
    })
}

#[derive(Clone, Copy)]
enum OrderFilter {
    All,
    Customer(i64),
    Status(OrderStatus),
}

impl OrderFilter {
    /// Predicate on `orders`, ending in `AND` so the soft-delete check follows.
    fn condition(self) -> &'static str {
        match self {
            OrderFilter::All => "",
            OrderFilter::Customer(_) => "customer_id = ? AND",
            OrderFilter::Status(_) => "status = ? AND",
        }
    }

    fn bind<'q>(self, query: Query<'q, Sqlite, SqliteArguments<'q>>) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        match self {
            OrderFilter::All => query,
            OrderFilter::Customer(customer_id) => query.bind(customer_id),
            OrderFilter::Status(status) => query.bind(status.as_str()),
        }
    }
}

fn order_from_row(row: &SqliteRow, customer: Option<Customer>, lines: Vec<OrderLine>) -> StoreResult<Order> {
    let total_value: String = row.try_get("total_value")?;
    let status: String = row.try_get("status")?;

    Ok(Order {
        id: row.try_get("id")?,
        customer_id: row.try_get("customer_id")?,
        customer,
        lines,
        total_value: parse_decimal("total_value", &total_value)?,
        status: OrderStatus::from_str(&status)
            .map_err(|_| StoreError::Corrupt(format!("status={:?}", status)))?,
        ordered_at: row.try_get("ordered_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl SqliteStore {
    /// Resolve the customer and lines of a single order row.
    async fn hydrate_order(&self, row: &SqliteRow) -> StoreResult<Order> {
        let id: i64 = row.try_get("id")?;
        let customer_id: i64 = row.try_get("customer_id")?;

        let customer = sqlx::query(&format!("{} = ?", CUSTOMER_SELECT))
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(customer_from_row)
            .transpose()?;

        let lines = sqlx::query(&format!("{} = ? ORDER BY l.id", LINE_SELECT))
            .bind(id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(line_from_row)
            .collect::<StoreResult<Vec<_>>>()?;

        order_from_row(row, customer, lines)
    }

    /// Load every matching order with three queries in one read transaction:
    /// orders, then their customers, then all of their lines.
    async fn fetch_orders(&self, filter: OrderFilter) -> StoreResult<Vec<Order>> {
        let matching = format!(
            "FROM orders WHERE {} deleted_at IS NULL",
            filter.condition()
        );
        let mut tx = self.pool.begin().await?;

        let rows = filter
            .bind(sqlx::query(&format!("SELECT {} {} ORDER BY id", ORDER_COLUMNS, matching)))
            .fetch_all(&mut *tx)
            .await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut customers: HashMap<i64, Customer> = HashMap::new();
        let customer_sql = format!("{} IN (SELECT customer_id {})", CUSTOMER_SELECT, matching);
        for row in filter.bind(sqlx::query(&customer_sql)).fetch_all(&mut *tx).await? {
            let customer = customer_from_row(&row)?;
            customers.insert(customer.id, customer);
        }

        let mut lines: HashMap<i64, Vec<OrderLine>> = HashMap::new();
        let line_sql = format!("{} IN (SELECT id {}) ORDER BY l.order_id, l.id", LINE_SELECT, matching);
        for row in filter.bind(sqlx::query(&line_sql)).fetch_all(&mut *tx).await? {
            let line = line_from_row(&row)?;
            lines.entry(line.order_id).or_default().push(line);
        }

        tx.commit().await?;
        tracing::debug!(orders = rows.len(), "Loaded orders in batch");

        rows.iter()
            .map(|row| {
                let id: i64 = row.try_get("id")?;
                let customer_id: i64 = row.try_get("customer_id")?;
                order_from_row(
                    row,
                    customers.get(&customer_id).cloned(),
                    lines.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }
}

#[async_trait]
impl OrderStore for SqliteStore {
    async fn create_order(&self, order: NewOrder) -> StoreResult<i64> {
        self.bounded(async {
            let now = Utc::now();
            let mut tx = self.pool.begin().await?;

            let result = sqlx::query(
                "INSERT INTO orders (customer_id, total_value, status, ordered_at, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(order.customer_id)
            .bind(order.total_value.to_string())
            .bind(order.status.as_str())
            .bind(order.ordered_at)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            let order_id = result.last_insert_rowid();

            for line in &order.lines {
                sqlx::query(
                    "INSERT INTO order_lines (order_id, product_id, quantity, unit_price, subtotal, created_at, updated_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(order_id)
                .bind(line.product_id)
                .bind(line.quantity)
                .bind(line.unit_price.to_string())
                .bind(line.subtotal.to_string())
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;

            tracing::info!(
                order_id = order_id,
                customer_id = order.customer_id,
                line_count = order.lines.len(),
                "✅ Persisted order with lines"
            );

            Ok::<_, StoreError>(order_id)
        })
        .await
    }

    async fn find_order(&self, id: i64) -> StoreResult<Option<Order>> {
        self.bounded(async {
            let sql = format!("SELECT {} FROM orders WHERE id = ? AND deleted_at IS NULL", ORDER_COLUMNS);
            let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
            match row {
                Some(row) => Ok(Some(self.hydrate_order(&row).await?)),
                None => Ok::<_, StoreError>(None),
            }
        })
        .await
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        self.bounded(self.fetch_orders(OrderFilter::All)).await
    }

    async fn list_orders_by_customer(&self, customer_id: i64) -> StoreResult<Vec<Order>> {
        self.bounded(self.fetch_orders(OrderFilter::Customer(customer_id))).await
    }

    async fn list_orders_by_status(&self, status: OrderStatus) -> StoreResult<Vec<Order>> {
        self.bounded(self.fetch_orders(OrderFilter::Status(status))).await
    }

    async fn update_order_status(&self, id: i64, status: OrderStatus) -> StoreResult<()> {
        self.bounded(async {
            let result = sqlx::query(
                "UPDATE orders SET status = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
            )
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound { entity: "order", id });
            }
            Ok(())
        })
        .await
    }

    async fn delete_order(&self, id: i64) -> StoreResult<()> {
        self.bounded(async {
            let now = Utc::now();
            let mut tx = self.pool.begin().await?;

            let result = sqlx::query("UPDATE orders SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
                .bind(now)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound { entity: "order", id });
            }

            let lines = sqlx::query("UPDATE order_lines SET deleted_at = ? WHERE order_id = ? AND deleted_at IS NULL")
                .bind(now)
                .bind(id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            tracing::debug!(order_id = id, lines = lines.rows_affected(), "Soft-deleted order with lines");
            Ok(())
        })
        .await
    }

    async fn count_orders(&self) -> StoreResult<i64> {
        self.bounded(async {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE deleted_at IS NULL")
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
    use crate::models::NewOrderLine;
    use crate::store::test_support::{memory_store, new_customer, new_product, notebook};
    use crate::store::{CustomerStore, ProductStore};
    use rust_decimal_macros::dec;

    async fn seeded_order(store: &SqliteStore) -> (i64, i64, i64) {
        let customer = store.insert_customer(new_customer(1)).await.unwrap();
        let product = store.insert_product(notebook()).await.unwrap();

        let order_id = store
            .create_order(NewOrder {
                customer_id: customer.id,
                lines: vec![NewOrderLine {
                    product_id: product.id,
                    quantity: 2,
                    unit_price: dec!(2999.99),
                    subtotal: dec!(5999.98),
                }],
                total_value: dec!(5999.98),
                status: OrderStatus::Pending,
                ordered_at: Utc::now(),
            })
            .await
            .unwrap();

        (customer.id, product.id, order_id)
    }

    async fn raw_count(store: &SqliteStore, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&store.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find_order_resolves_relations() {
        let store = memory_store().await;
        let (customer_id, product_id, order_id) = seeded_order(&store).await;

        let order = store.find_order(order_id).await.unwrap().unwrap();

        assert_eq!(order.customer_id, customer_id);
        assert_eq!(order.customer.as_ref().unwrap().id, customer_id);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].product_id, product_id);
        assert_eq!(order.lines[0].product.as_ref().unwrap().sku, "NB-001");
        assert_eq!(order.total_value, dec!(5999.98));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_order_is_atomic() {
        let store = memory_store().await;
        let customer = store.insert_customer(new_customer(1)).await.unwrap();
        let product = store.insert_product(notebook()).await.unwrap();

        // The second line violates the quantity CHECK constraint.
        let result = store
            .create_order(NewOrder {
                customer_id: customer.id,
                lines: vec![
                    NewOrderLine {
                        product_id: product.id,
                        quantity: 1,
                        unit_price: dec!(2999.99),
                        subtotal: dec!(2999.99),
                    },
                    NewOrderLine {
                        product_id: product.id,
                        quantity: 0,
                        unit_price: dec!(2999.99),
                        subtotal: dec!(0),
                    },
                ],
                total_value: dec!(2999.99),
                status: OrderStatus::Pending,
                ordered_at: Utc::now(),
            })
            .await;

        assert!(matches!(result, Err(StoreError::Database(_))));
        assert_eq!(raw_count(&store, "orders").await, 0);
        assert_eq!(raw_count(&store, "order_lines").await, 0);
    }

    #[tokio::test]
    async fn test_delete_order_cascades_to_lines() {
        let store = memory_store().await;
        let (_, _, order_id) = seeded_order(&store).await;

        store.delete_order(order_id).await.unwrap();

        assert!(store.find_order(order_id).await.unwrap().is_none());
        assert_eq!(store.count_orders().await.unwrap(), 0);
        let live_lines: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM order_lines WHERE deleted_at IS NULL")
                .fetch_one(&store.pool)
                .await
                .unwrap();
        assert_eq!(live_lines, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_order_is_not_found() {
        let store = memory_store().await;
        let result = store.delete_order(7).await;
        assert!(matches!(result, Err(StoreError::NotFound { entity: "order", id: 7 })));
    }

    #[tokio::test]
    async fn test_referenced_customer_and_product_cannot_be_deleted() {
        let store = memory_store().await;
        let (customer_id, product_id, order_id) = seeded_order(&store).await;

        assert!(matches!(store.delete_customer(customer_id).await, Err(StoreError::Conflict(_))));
        assert!(matches!(store.delete_product(product_id).await, Err(StoreError::Conflict(_))));

        store.delete_order(order_id).await.unwrap();
        store.delete_product(product_id).await.unwrap();
        store.delete_customer(customer_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_unresolved_product_leaves_line_without_product() {
        let store = memory_store().await;
        let (_, product_id, order_id) = seeded_order(&store).await;

        sqlx::query("UPDATE products SET deleted_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(product_id)
            .execute(&store.pool)
            .await
            .unwrap();

        let order = store.find_order(order_id).await.unwrap().unwrap();
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].product_id, product_id);
        assert!(order.lines[0].product.is_none());
    }

    #[tokio::test]
    async fn test_list_by_customer_and_status() {
        let store = memory_store().await;
        let (customer_id, _, order_id) = seeded_order(&store).await;
        let other = store.insert_customer(new_customer(2)).await.unwrap();
        let mouse = store.insert_product(new_product("MS-001", dec!(99.99), 5)).await.unwrap();
        store
            .create_order(NewOrder {
                customer_id: other.id,
                lines: vec![NewOrderLine {
                    product_id: mouse.id,
                    quantity: 1,
                    unit_price: dec!(99.99),
                    subtotal: dec!(99.99),
                }],
                total_value: dec!(99.99),
                status: OrderStatus::Paid,
                ordered_at: Utc::now(),
            })
            .await
            .unwrap();

        let mine = store.list_orders_by_customer(customer_id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, order_id);

        let paid = store.list_orders_by_status(OrderStatus::Paid).await.unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].customer_id, other.id);

        assert_eq!(store.list_orders().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_groups_lines_under_their_orders() {
        let store = memory_store().await;
        let (customer_id, product_id, first) = seeded_order(&store).await;
        let mouse = store.insert_product(new_product("MS-001", dec!(99.99), 5)).await.unwrap();
        let line = |product_id: i64, price| NewOrderLine {
            product_id,
            quantity: 1,
            unit_price: price,
            subtotal: price,
        };
        let second = store
            .create_order(NewOrder {
                customer_id,
                lines: vec![line(mouse.id, dec!(99.99)), line(product_id, dec!(2999.99))],
                total_value: dec!(3099.98),
                status: OrderStatus::Pending,
                ordered_at: Utc::now(),
            })
            .await
            .unwrap();

        let orders = store.list_orders().await.unwrap();

        assert_eq!(orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![first, second]);
        assert_eq!(orders[0].lines.len(), 1);
        assert_eq!(orders[1].lines.len(), 2);
        assert_eq!(orders[1].lines[0].product_id, mouse.id);
        assert!(orders.iter().all(|o| o.lines.iter().all(|l| l.order_id == o.id)));
        assert!(orders.iter().all(|o| o.customer.as_ref().map(|c| c.id) == Some(customer_id)));
        assert_eq!(orders[1], store.find_order(second).await.unwrap().unwrap());
    }

    #[tokio::test]
    async fn test_list_with_no_match_is_empty() {
        let store = memory_store().await;
        seeded_order(&store).await;
        assert!(store.list_orders_by_status(OrderStatus::Cancelled).await.unwrap().is_empty());
        assert!(store.list_orders_by_customer(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_status_on_missing_order_is_not_found() {
        let store = memory_store().await;
        let result = store.update_order_status(3, OrderStatus::Paid).await;
        assert!(matches!(result, Err(StoreError::NotFound { id: 3, .. })));
    }
}
