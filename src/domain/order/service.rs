use chrono::Utc;
use std::sync::Arc;

use super::assembler::{assemble, OrderAssembler};
use super::commands::{CreateOrder, UpdateOrderStatus};
use super::errors::OrderError;
use super::pricing::price_line;
use super::status_guard::guard_transition;
use super::validator::OrderValidator;
use super::value_objects::OrderStatus;
use crate::models::Order;
use crate::store::{CustomerStore, OrderStore, ProductStore};

// ============================================================================
// Order Service
// ============================================================================
//
// Create flow: shape check → Validator → Pricing → Assembler → Store
//              → re-read with relations
//
// ============================================================================

pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    validator: OrderValidator,
    assembler: OrderAssembler,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        customers: Arc<dyn CustomerStore>,
        products: Arc<dyn ProductStore>,
    ) -> Self {
        Self {
            validator: OrderValidator::new(customers, products),
            assembler: OrderAssembler::new(orders.clone()),
            orders,
        }
    }

    pub async fn create(&self, request: CreateOrder) -> Result<Order, OrderError> {
        let status = request.validate()?;
        let validated = self.validator.validate(request.customer_id, &request.items).await?;

        let lines = validated
            .lines
            .iter()
            .map(|(product, quantity)| price_line(product, *quantity))
            .collect::<Result<Vec<_>, _>>()?;
        let new_order = assemble(validated.customer.id, lines, status, Utc::now())?;

        let order = self.assembler.persist(new_order).await?;
        tracing::info!(
            order_id = order.id,
            customer_id = order.customer_id,
            lines = order.lines.len(),
            total = %order.total_value,
            "✅ Order created"
        );
        Ok(order)
    }

    pub async fn get(&self, id: i64) -> Result<Order, OrderError> {
        self.orders.find_order(id).await?.ok_or(OrderError::NotFound(id))
    }

    pub async fn list(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_orders().await?)
    }

    pub async fn list_by_customer(&self, customer_id: i64) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_orders_by_customer(customer_id).await?)
    }

    pub async fn list_by_status(&self, status: &str) -> Result<Vec<Order>, OrderError> {
        let status: OrderStatus = status.parse()?;
        Ok(self.orders.list_orders_by_status(status).await?)
    }

    /// The requested value is checked before the order is looked up.
    pub async fn update_status(&self, id: i64, request: UpdateOrderStatus) -> Result<Order, OrderError> {
        let next = guard_transition(&request.status)?;
        let current = self.get(id).await?;

        self.orders.update_order_status(id, next).await?;
        tracing::info!(order_id = id, from = %current.status, to = %next, "Order status updated");

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), OrderError> {
        self.orders.delete_order(id).await?;
        tracing::info!(order_id = id, "Order deleted");
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, OrderError> {
        Ok(self.orders.count_orders().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderItem;
    use crate::domain::product::MAX_PRICE;
    use crate::models::{Customer, Product};
    use crate::store::test_support::{memory_store, new_customer, new_product, notebook};
    use crate::store::SqliteStore;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct Fixture {
        store: Arc<SqliteStore>,
        service: OrderService,
        customer: Customer,
        notebook: Product,
        mouse: Product,
    }

    async fn fixture() -> Fixture {
        let store = memory_store().await;
        let customer = store.insert_customer(new_customer(1)).await.unwrap();
        let notebook = store.insert_product(notebook()).await.unwrap();
        let mouse = store.insert_product(new_product("MS-001", dec!(99.99), 50)).await.unwrap();
        let service = OrderService::new(store.clone(), store.clone(), store.clone());
        Fixture { store, service, customer, notebook, mouse }
    }

    fn request(customer_id: i64, items: &[(i64, i32)]) -> CreateOrder {
        CreateOrder {
            customer_id,
            items: items
                .iter()
                .map(|&(product_id, quantity)| OrderItem { product_id, quantity })
                .collect(),
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_order_computes_exact_total() {
        let f = fixture().await;
        let order = f
            .service
            .create(request(f.customer.id, &[(f.notebook.id, 2), (f.mouse.id, 1)]))
            .await
            .unwrap();

        assert_eq!(order.total_value, dec!(6099.97));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].subtotal, dec!(5999.98));
        assert_eq!(order.customer.as_ref().map(|c| c.id), Some(f.customer.id));
        assert!(order.lines.iter().all(|line| line.product.is_some()));
    }

    #[tokio::test]
    async fn test_insufficient_stock_persists_nothing() {
        let f = fixture().await;
        let low = f.store.insert_product(new_product("LOW-001", dec!(1), 5)).await.unwrap();

        let err = f.service.create(request(f.customer.id, &[(low.id, 10)])).await.unwrap_err();

        assert!(matches!(err, OrderError::InsufficientStock(_)));
        assert_eq!(f.service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_amount_is_refused() {
        let f = fixture().await;
        // Stored before the price ceiling existed
        let legacy = new_product("BIG-001", Decimal::from_i128_with_scale(10_i128.pow(28), 0), 10);
        let big = f.store.insert_product(legacy).await.unwrap();

        let err = f.service.create(request(f.customer.id, &[(big.id, 10)])).await.unwrap_err();
        assert!(matches!(err, OrderError::AmountOverflow));
        assert_eq!(err.reason(), "amount_overflow");

        let err = f
            .service
            .create(request(f.customer.id, &[(big.id, 5), (big.id, 5)]))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::AmountOverflow));
        assert_eq!(f.service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_extreme_quantity_at_ceiling_price() {
        let f = fixture().await;
        let ceiling = new_product("TOP-001", MAX_PRICE, i32::MAX);
        let top = f.store.insert_product(ceiling).await.unwrap();

        let order = f.service.create(request(f.customer.id, &[(top.id, i32::MAX)])).await.unwrap();
        assert_eq!(order.total_value, MAX_PRICE * Decimal::from(i32::MAX));
    }

    #[tokio::test]
    async fn test_inactive_product_persists_nothing() {
        let f = fixture().await;
        let mut retired = new_product("OLD-001", dec!(5), 3);
        retired.active = false;
        let retired = f.store.insert_product(retired).await.unwrap();

        let err = f
            .service
            .create(request(f.customer.id, &[(f.notebook.id, 1), (retired.id, 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::ProductInactive(_)));
        assert_eq!(f.service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_customer_persists_nothing() {
        let f = fixture().await;
        let err = f.service.create(request(404, &[(f.notebook.id, 1)])).await.unwrap_err();

        assert!(matches!(err, OrderError::CustomerNotFound(404)));
        assert_eq!(f.service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_requested_status_is_kept() {
        let f = fixture().await;
        let mut req = request(f.customer.id, &[(f.mouse.id, 1)]);
        req.status = Some("paid".to_string());

        let order = f.service.create(req).await.unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_status_can_move_backwards() {
        let f = fixture().await;
        let order = f.service.create(request(f.customer.id, &[(f.mouse.id, 1)])).await.unwrap();

        let delivered = f
            .service
            .update_status(order.id, UpdateOrderStatus { status: "delivered".to_string() })
            .await
            .unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);

        let pending = f
            .service
            .update_status(order.id, UpdateOrderStatus { status: "pending".to_string() })
            .await
            .unwrap();
        assert_eq!(pending.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_invalid_status_is_rejected_before_lookup() {
        let f = fixture().await;
        let err = f
            .service
            .update_status(999, UpdateOrderStatus { status: "lost".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidStatus(_)));

        let err = f
            .service
            .update_status(999, UpdateOrderStatus { status: "paid".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::NotFound(999)));
    }

    #[tokio::test]
    async fn test_price_change_does_not_touch_existing_order() {
        let f = fixture().await;
        let order = f.service.create(request(f.customer.id, &[(f.mouse.id, 3)])).await.unwrap();

        let mut repriced = f.mouse.clone();
        repriced.price = dec!(149.99);
        f.store.update_product(&repriced).await.unwrap();

        let reread = f.service.get(order.id).await.unwrap();
        assert_eq!(reread.lines[0].unit_price, dec!(99.99));
        assert_eq!(reread.lines[0].subtotal, dec!(299.97));
        assert_eq!(reread.total_value, dec!(299.97));
        assert_eq!(reread.lines[0].product.as_ref().map(|p| p.price), Some(dec!(149.99)));
    }

    #[tokio::test]
    async fn test_delete_then_lookup_is_not_found() {
        let f = fixture().await;
        let order = f.service.create(request(f.customer.id, &[(f.mouse.id, 1)])).await.unwrap();

        f.service.delete(order.id).await.unwrap();

        assert!(matches!(f.service.get(order.id).await, Err(OrderError::NotFound(_))));
        assert!(matches!(f.service.delete(order.id).await, Err(OrderError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let f = fixture().await;
        let other = f.store.insert_customer(new_customer(2)).await.unwrap();
        f.service.create(request(f.customer.id, &[(f.mouse.id, 1)])).await.unwrap();
        let mut paid = request(other.id, &[(f.notebook.id, 1)]);
        paid.status = Some("paid".to_string());
        f.service.create(paid).await.unwrap();

        assert_eq!(f.service.list().await.unwrap().len(), 2);
        assert_eq!(f.service.list_by_customer(other.id).await.unwrap().len(), 1);
        assert_eq!(f.service.list_by_status("pending").await.unwrap().len(), 1);
        assert!(matches!(
            f.service.list_by_status("nope").await,
            Err(OrderError::InvalidStatus(_))
        ));
    }
}
