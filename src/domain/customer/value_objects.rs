use serde::{Deserialize, Serialize};

use crate::domain::validation::{check_length, FieldError};

// ============================================================================
// Customer Value Objects
// ============================================================================

/// Customer email address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn parse(email: impl Into<String>) -> Result<Self, FieldError> {
        let email = email.into();
        let (local, domain) = email
            .split_once('@')
            .ok_or_else(|| FieldError::new("email", "must be a valid email address"))?;

        let well_formed = !local.is_empty()
            && !domain.contains('@')
            && !email.chars().any(char::is_whitespace)
            && domain.split('.').count() >= 2
            && domain.split('.').all(|label| !label.is_empty());

        if !well_formed {
            return Err(FieldError::new("email", "must be a valid email address"));
        }
        Ok(Self(email))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// National taxpayer id: exactly 11 ASCII digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalId(String);

impl NationalId {
    pub fn parse(value: impl Into<String>) -> Result<Self, FieldError> {
        let value = value.into();
        if value.len() != 11 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldError::new("national_id", "must be exactly 11 digits"));
        }
        Ok(Self(value))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Customer phone number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(phone: impl Into<String>) -> Result<Self, FieldError> {
        let phone = phone.into();
        check_length("phone", &phone, 10, 15)?;
        Ok(Self(phone))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
