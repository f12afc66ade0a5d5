// ============================================================================
// Order Domain - the order-creation workflow
// ============================================================================
//
// - Value objects (OrderItem, OrderStatus)
// - Commands (CreateOrder, UpdateOrderStatus)
// - Errors (OrderError)
// - Validator: customer and per-line product checks against the store
// - Pricing: snapshot unit price, subtotal and total
// - Assembler: builds the aggregate and persists it atomically
// - Status guard: closed status vocabulary on update
// - Service (OrderService) wiring the pieces together
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod validator;
pub mod pricing;
pub mod assembler;
pub mod status_guard;
pub mod service;

pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use service::*;
