use serde::Deserialize;

use super::errors::OrderError;
use super::value_objects::{OrderItem, OrderStatus};

// ============================================================================
// Order Commands
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    pub customer_id: i64,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub status: Option<String>,
}

impl CreateOrder {
    /// Shape checks only; nothing here touches the store.
    /// Returns the requested status, if one was given.
    pub fn validate(&self) -> Result<Option<OrderStatus>, OrderError> {
        if self.customer_id <= 0 {
            return Err(OrderError::InvalidCustomerId(self.customer_id));
        }
        if self.items.is_empty() {
            return Err(OrderError::EmptyItems);
        }
        for item in &self.items {
            if item.product_id <= 0 {
                return Err(OrderError::InvalidProductId(item.product_id));
            }
            if item.quantity <= 0 {
                return Err(OrderError::InvalidQuantity(item.quantity));
            }
        }

        match self.status.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatus {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(items: Vec<OrderItem>) -> CreateOrder {
        CreateOrder { customer_id: 1, items, status: None }
    }

    #[test]
    fn test_empty_items_rejected() {
        assert!(matches!(request(vec![]).validate(), Err(OrderError::EmptyItems)));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let req = request(vec![OrderItem { product_id: 1, quantity: 0 }]);
        assert!(matches!(req.validate(), Err(OrderError::InvalidQuantity(0))));
    }

    #[test]
    fn test_non_positive_ids_rejected() {
        let mut req = request(vec![OrderItem { product_id: 1, quantity: 1 }]);
        req.customer_id = 0;
        assert!(matches!(req.validate(), Err(OrderError::InvalidCustomerId(0))));

        let req = request(vec![OrderItem { product_id: -4, quantity: 1 }]);
        assert!(matches!(req.validate(), Err(OrderError::InvalidProductId(-4))));
    }

    #[test]
    fn test_status_is_optional_but_checked() {
        let mut req = request(vec![OrderItem { product_id: 1, quantity: 1 }]);
        assert_eq!(req.validate().unwrap(), None);

        req.status = Some(String::new());
        assert_eq!(req.validate().unwrap(), None);

        req.status = Some("paid".to_string());
        assert_eq!(req.validate().unwrap(), Some(OrderStatus::Paid));

        req.status = Some("lost".to_string());
        assert!(matches!(req.validate(), Err(OrderError::InvalidStatus(_))));
    }

    #[test]
    fn test_missing_status_field_deserializes() {
        let req: CreateOrder =
            serde_json::from_str(r#"{"customer_id": 1, "items": [{"product_id": 2, "quantity": 3}]}"#).unwrap();
        assert_eq!(req.status, None);
        assert_eq!(req.items.len(), 1);
    }
}
