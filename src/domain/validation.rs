// ============================================================================
// Field Validation - input-shape rules shared by all aggregates
// ============================================================================

/// A request field that failed its shape rule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self { field, reason: reason.into() }
    }
}

/// Character count must fall within `min..=max`.
pub fn check_length(field: &'static str, value: &str, min: usize, max: usize) -> Result<(), FieldError> {
    let len = value.chars().count();
    if len < min {
        return Err(FieldError::new(field, format!("must have at least {} characters", min)));
    }
    if len > max {
        return Err(FieldError::new(field, format!("must have at most {} characters", max)));
    }
    Ok(())
}
