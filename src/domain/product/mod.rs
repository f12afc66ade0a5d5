// ============================================================================
// Product Domain
// ============================================================================
//
// - Commands (CreateProduct, UpdateProduct) with their shape rules
// - Errors (ProductError)
// - Service (ProductService over a ProductStore)
//
// ============================================================================

pub mod commands;
pub mod errors;
pub mod service;

pub use commands::*;
pub use errors::*;
pub use service::*;
