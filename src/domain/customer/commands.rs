use serde::Deserialize;

use super::value_objects::{Email, NationalId, PhoneNumber};
use crate::domain::validation::{check_length, FieldError};
use crate::models::{Customer, NewCustomer};

// ============================================================================
// Customer Commands
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomer {
    pub name: String,
    pub email: String,
    pub national_id: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CreateCustomer {
    pub fn validate(self) -> Result<NewCustomer, FieldError> {
        check_length("name", &self.name, 3, 100)?;
        let email = Email::parse(self.email)?;
        let national_id = NationalId::parse(self.national_id)?;
        let phone = match self.phone.filter(|p| !p.is_empty()) {
            Some(phone) => PhoneNumber::parse(phone)?.into_inner(),
            None => String::new(),
        };

        Ok(NewCustomer {
            name: self.name,
            email: email.into_inner(),
            national_id: national_id.into_inner(),
            phone,
        })
    }
}

/// Partial update. Absent or empty fields leave the stored value alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl UpdateCustomer {
    pub fn validate(&self) -> Result<(), FieldError> {
        if let Some(name) = present(&self.name) {
            check_length("name", name, 3, 100)?;
        }
        if let Some(email) = present(&self.email) {
            Email::parse(email)?;
        }
        if let Some(national_id) = present(&self.national_id) {
            NationalId::parse(national_id)?;
        }
        if let Some(phone) = present(&self.phone) {
            PhoneNumber::parse(phone)?;
        }
        Ok(())
    }

    pub fn email(&self) -> Option<&str> {
        present(&self.email)
    }

    pub fn national_id(&self) -> Option<&str> {
        present(&self.national_id)
    }

    /// Overwrite `customer` with every non-empty field.
    pub fn apply_to(self, customer: &mut Customer) {
        let keep = |v: Option<String>| v.filter(|s| !s.is_empty());
        if let Some(name) = keep(self.name) {
            customer.name = name;
        }
        if let Some(email) = keep(self.email) {
            customer.email = email;
        }
        if let Some(national_id) = keep(self.national_id) {
            customer.national_id = national_id;
        }
        if let Some(phone) = keep(self.phone) {
            customer.phone = phone;
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
