use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::validation::{check_length, FieldError};
use crate::models::{NewProduct, Product};

// ============================================================================
// Product Commands
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    pub sku: String,
    #[serde(default)]
    pub category: String,
    /// Absent means active.
    #[serde(default)]
    pub active: Option<bool>,
}

impl CreateProduct {
    pub fn validate(self) -> Result<NewProduct, FieldError> {
        check_length("name", &self.name, 3, 200)?;
        check_length("description", &self.description, 0, 1000)?;
        check_price(self.price)?;
        check_stock(self.stock)?;
        check_length("sku", &self.sku, 3, 50)?;
        check_length("category", &self.category, 0, 100)?;

        Ok(NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            sku: self.sku,
            category: self.category,
            active: self.active.unwrap_or(true),
        })
    }
}

/// Partial update. `None` leaves the stored value alone, and so does an
/// empty string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl UpdateProduct {
    pub fn validate(&self) -> Result<(), FieldError> {
        if let Some(name) = self.name.as_deref().filter(|s| !s.is_empty()) {
            check_length("name", name, 3, 200)?;
        }
        if let Some(description) = &self.description {
            check_length("description", description, 0, 1000)?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        if let Some(stock) = self.stock {
            check_stock(stock)?;
        }
        if let Some(sku) = self.new_sku() {
            check_length("sku", sku, 3, 50)?;
        }
        if let Some(category) = &self.category {
            check_length("category", category, 0, 100)?;
        }
        Ok(())
    }

    pub fn new_sku(&self) -> Option<&str> {
        self.sku.as_deref().filter(|s| !s.is_empty())
    }

    pub fn apply_to(self, product: &mut Product) {
        let keep = |v: Option<String>| v.filter(|s| !s.is_empty());
        if let Some(name) = keep(self.name) {
            product.name = name;
        }
        if let Some(description) = keep(self.description) {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(sku) = keep(self.sku) {
            product.sku = sku;
        }
        if let Some(category) = keep(self.category) {
            product.category = category;
        }
        if let Some(active) = self.active {
            product.active = active;
        }
    }
}

/// Highest accepted unit price. Any `i32` quantity times this stays well
/// inside the Decimal range.
pub const MAX_PRICE: Decimal = Decimal::from_parts(0x4876_E7FF, 0x17, 0, false, 2); // 999_999_999.99

fn check_price(price: Decimal) -> Result<(), FieldError> {
    if price <= Decimal::ZERO {
        return Err(FieldError::new("price", "must be greater than zero"));
    }
    if price > MAX_PRICE {
        return Err(FieldError::new("price", format!("must not exceed {}", MAX_PRICE)));
    }
    Ok(())
}

fn check_stock(stock: i32) -> Result<(), FieldError> {
    if stock < 0 {
        return Err(FieldError::new("stock", "must not be negative"));
    }
    Ok(())
}
