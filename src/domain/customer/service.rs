use std::sync::Arc;

use super::commands::{CreateCustomer, UpdateCustomer};
use super::errors::CustomerError;
use crate::models::Customer;
use crate::store::{CustomerStore, StoreError};

// ============================================================================
// Customer Service
// ============================================================================

pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, request: CreateCustomer) -> Result<Customer, CustomerError> {
        let customer = request.validate()?;

        if self.store.find_customer_by_email(&customer.email).await?.is_some() {
            return Err(CustomerError::Duplicate(format!("email {}", customer.email)));
        }
        if self.store.find_customer_by_national_id(&customer.national_id).await?.is_some() {
            return Err(CustomerError::Duplicate(format!("national id {}", customer.national_id)));
        }

        let created = self.store.insert_customer(customer).await?;
        tracing::info!(customer_id = created.id, "✅ Customer registered");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Customer, CustomerError> {
        self.store
            .find_customer(id)
            .await?
            .ok_or(CustomerError::NotFound(id))
    }

    pub async fn list(&self) -> Result<Vec<Customer>, CustomerError> {
        Ok(self.store.list_customers().await?)
    }

    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Customer>, CustomerError> {
        Ok(self.store.search_customers_by_name(name).await?)
    }

    pub async fn update(&self, id: i64, request: UpdateCustomer) -> Result<Customer, CustomerError> {
        request.validate()?;
        let mut customer = self.get(id).await?;

        if let Some(email) = request.email() {
            if let Some(other) = self.store.find_customer_by_email(email).await? {
                if other.id != id {
                    return Err(CustomerError::Duplicate(format!("email {}", email)));
                }
            }
        }
        if let Some(national_id) = request.national_id() {
            if let Some(other) = self.store.find_customer_by_national_id(national_id).await? {
                if other.id != id {
                    return Err(CustomerError::Duplicate(format!("national id {}", national_id)));
                }
            }
        }

        request.apply_to(&mut customer);
        let updated = self.store.update_customer(&customer).await?;
        tracing::info!(customer_id = id, "Customer updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), CustomerError> {
        self.store.delete_customer(id).await.map_err(|e| match e {
            StoreError::Conflict(msg) => CustomerError::InUse(msg),
            other => other.into(),
        })?;
        tracing::info!(customer_id = id, "Customer deleted");
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, CustomerError> {
        Ok(self.store.count_customers().await?)
    }
}
