use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order::OrderStatus;

// ============================================================================
// Persisted Records
// ============================================================================
//
// Rows as the entity store hands them out. Soft-deleted rows never reach
// this layer, so there is no `deleted_at` here.
//
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub national_id: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub sku: String,
    pub category: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order aggregate: the order row plus its owned lines.
///
/// `customer` and each line's `product` are populated only when the
/// referenced row still resolves.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub customer: Option<Customer>,
    pub lines: Vec<OrderLine>,
    pub total_value: Decimal,
    pub status: OrderStatus,
    pub ordered_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product: Option<Product>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

// ============================================================================
// Insert Shapes
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub national_id: String,
    pub phone: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub sku: String,
    pub category: String,
    pub active: bool,
}

/// An order ready to be written, lines already priced.
#[derive(Clone, Debug, PartialEq)]
pub struct NewOrder {
    pub customer_id: i64,
    pub lines: Vec<NewOrderLine>,
    pub total_value: Decimal,
    pub status: OrderStatus,
    pub ordered_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewOrderLine {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}
