use std::sync::Arc;

use super::errors::OrderError;
use super::value_objects::OrderItem;
use crate::models::{Customer, Product};
use crate::store::{CustomerStore, ProductStore};

// ============================================================================
// Order Validator
// ============================================================================
//
// Resolves the customer and every requested product, in request order, and
// stops at the first failure. Read-only: stock is checked, never reserved.
//
// ============================================================================

/// A request whose references all resolved and passed the business rules.
#[derive(Debug, Clone)]
pub struct ValidatedOrder {
    pub customer: Customer,
    pub lines: Vec<(Product, i32)>,
}

pub struct OrderValidator {
    customers: Arc<dyn CustomerStore>,
    products: Arc<dyn ProductStore>,
}

impl OrderValidator {
    pub fn new(customers: Arc<dyn CustomerStore>, products: Arc<dyn ProductStore>) -> Self {
        Self { customers, products }
    }

    pub async fn validate(&self, customer_id: i64, items: &[OrderItem]) -> Result<ValidatedOrder, OrderError> {
        let customer = self
            .customers
            .find_customer(customer_id)
            .await?
            .ok_or(OrderError::CustomerNotFound(customer_id))?;

        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let product = self
                .products
                .find_product(item.product_id)
                .await?
                .ok_or(OrderError::ProductNotFound(item.product_id))?;

            check_line(&product, item.quantity)?;
            lines.push((product, item.quantity));
        }

        Ok(ValidatedOrder { customer, lines })
    }
}

/// Stock is checked before the active flag.
pub fn check_line(product: &Product, quantity: i32) -> Result<(), OrderError> {
    if product.stock < quantity {
        return Err(OrderError::InsufficientStock(product.name.clone()));
    }
    if !product.active {
        return Err(OrderError::ProductInactive(product.name.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{memory_store, new_customer, new_product, notebook};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn product(stock: i32, active: bool) -> Product {
        let now = Utc::now();
        Product {
            id: 1,
            name: "Notebook".to_string(),
            description: String::new(),
            price: dec!(10),
            stock,
            sku: "NB-001".to_string(),
            category: String::new(),
            active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_line_within_stock_passes() {
        assert!(check_line(&product(5, true), 5).is_ok());
    }

    #[test]
    fn test_line_over_stock_fails() {
        let err = check_line(&product(5, true), 10).unwrap_err();
        assert!(matches!(err, OrderError::InsufficientStock(name) if name == "Notebook"));
    }

    #[test]
    fn test_inactive_product_fails() {
        let err = check_line(&product(5, false), 1).unwrap_err();
        assert!(matches!(err, OrderError::ProductInactive(_)));
    }

    #[test]
    fn test_stock_is_checked_before_active_flag() {
        let err = check_line(&product(0, false), 1).unwrap_err();
        assert!(matches!(err, OrderError::InsufficientStock(_)));
    }

    #[tokio::test]
    async fn test_unknown_customer() {
        let store = memory_store().await;
        let validator = OrderValidator::new(store.clone(), store);

        let items = [OrderItem { product_id: 1, quantity: 1 }];
        let err = validator.validate(7, &items).await.unwrap_err();
        assert!(matches!(err, OrderError::CustomerNotFound(7)));
    }

    #[tokio::test]
    async fn test_first_failing_line_wins() {
        let store = memory_store().await;
        let customer = store.insert_customer(new_customer(1)).await.unwrap();
        let nb = store.insert_product(notebook()).await.unwrap();
        let mut retired = new_product("OLD-001", dec!(5), 3);
        retired.active = false;
        let retired = store.insert_product(retired).await.unwrap();

        let validator = OrderValidator::new(store.clone(), store);
        let items = [
            OrderItem { product_id: nb.id, quantity: 1 },
            OrderItem { product_id: 99, quantity: 1 },
            OrderItem { product_id: retired.id, quantity: 1 },
        ];

        let err = validator.validate(customer.id, &items).await.unwrap_err();
        assert!(matches!(err, OrderError::ProductNotFound(99)));
    }

    #[tokio::test]
    async fn test_valid_request_resolves_every_line() {
        let store = memory_store().await;
        let customer = store.insert_customer(new_customer(1)).await.unwrap();
        let nb = store.insert_product(notebook()).await.unwrap();

        let validator = OrderValidator::new(store.clone(), store);
        let items = [OrderItem { product_id: nb.id, quantity: 2 }];
        let validated = validator.validate(customer.id, &items).await.unwrap();

        assert_eq!(validated.customer.id, customer.id);
        assert_eq!(validated.lines.len(), 1);
        assert_eq!(validated.lines[0].1, 2);
    }
}
