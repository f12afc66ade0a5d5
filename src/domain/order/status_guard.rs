use super::errors::OrderError;
use super::value_objects::OrderStatus;

// ============================================================================
// Status Transition Guard
// ============================================================================
//
// Only the vocabulary is enforced. Any status may move to any other status,
// including back to `pending`.
//
// ============================================================================

pub fn guard_transition(requested: &str) -> Result<OrderStatus, OrderError> {
    requested.parse()
}
