//! Customer profile reads and edits.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_database::traits::CustomerStore;
use activityhub_entity::customer::Customer;

use crate::context::RequestContext;

/// Editable customer profile fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCustomerProfile {
    /// New display name.
    pub display_name: Option<String>,
    /// New phone number. An empty string clears it.
    pub phone: Option<String>,
}

/// Manages the caller's customer profile.
#[derive(Debug, Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerStore>,
}

impl CustomerService {
    /// Creates a new customer service.
    pub fn new(customers: Arc<dyn CustomerStore>) -> Self {
        Self { customers }
    }

    /// The caller's profile.
    pub async fn get_my_profile(&self, ctx: &RequestContext) -> AppResult<Customer> {
        let user_id = ctx.require_user()?;
        self.customers
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer profile not found"))
    }

    /// Update the caller's profile.
    pub async fn update_my_profile(
        &self,
        ctx: &RequestContext,
        input: UpdateCustomerProfile,
    ) -> AppResult<Customer> {
        let mut customer = self.get_my_profile(ctx).await?;

        if let Some(name) = &input.display_name
            && name.trim().is_empty()
        {
            return Err(AppError::validation("Display name cannot be empty"));
        }

        customer.update_profile(input.display_name, input.phone);
        let customer = self.customers.update(&customer).await?;

        info!(customer_id = %customer.id, "Customer profile updated");
        Ok(customer)
    }
}
