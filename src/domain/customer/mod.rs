// ============================================================================
// Customer Domain
// ============================================================================
//
// - Value objects (Email, NationalId, PhoneNumber)
// - Commands (CreateCustomer, UpdateCustomer) with their shape rules
// - Errors (CustomerError)
// - Service (CustomerService over a CustomerStore)
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod service;

pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use service::*;
