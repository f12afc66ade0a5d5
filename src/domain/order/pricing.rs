use rust_decimal::Decimal;

use super::errors::OrderError;
use crate::models::Product;

// ============================================================================
// Pricing Engine
// ============================================================================
//
// All arithmetic is checked. An amount outside the Decimal range is refused
// with `OrderError::AmountOverflow`.
//
// ============================================================================

/// A line with its unit price captured from the product at order time.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

pub fn line_subtotal(unit_price: Decimal, quantity: i32) -> Result<Decimal, OrderError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(OrderError::AmountOverflow)
}

pub fn price_line(product: &Product, quantity: i32) -> Result<PricedLine, OrderError> {
    Ok(PricedLine {
        product_id: product.id,
        quantity,
        unit_price: product.price,
        subtotal: line_subtotal(product.price, quantity)?,
    })
}

pub fn order_total(lines: &[PricedLine]) -> Result<Decimal, OrderError> {
    lines.iter().try_fold(Decimal::ZERO, |total, line| {
        total.checked_add(line.subtotal).ok_or(OrderError::AmountOverflow)
    })
}
