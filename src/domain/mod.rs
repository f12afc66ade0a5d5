// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// One subdirectory per aggregate, each with its commands, errors and a
// service built over the store traits. Shape rules shared by all of them
// live in `validation`.
//
// ============================================================================

pub mod validation;
pub mod customer;
pub mod product;
pub mod order;
