//! Provider accounts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_core::types::pagination::{PageRequest, PageResponse};
use activityhub_database::traits::ProviderStore;
use activityhub_entity::provider::ActivityProvider;
use activityhub_entity::user::UserRole;

use crate::access::{load_provider, managed_provider};
use crate::context::RequestContext;

/// Provider registration input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProvider {
    /// Public name.
    pub name: String,
    /// Public description.
    pub description: Option<String>,
    /// Contact email. Defaults to the caller's email.
    pub contact_email: Option<String>,
}

/// Editable provider fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProvider {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New contact email.
    pub contact_email: Option<String>,
}

/// Manages activity providers.
#[derive(Debug, Clone)]
pub struct ProviderService {
    providers: Arc<dyn ProviderStore>,
}

impl ProviderService {
    /// Creates a new provider service.
    pub fn new(providers: Arc<dyn ProviderStore>) -> Self {
        Self { providers }
    }

    /// Register a provider owned by the caller.
    pub async fn register_provider(
        &self,
        ctx: &RequestContext,
        input: NewProvider,
    ) -> AppResult<ActivityProvider> {
        let user_id = ctx.require_user()?;
        if ctx.role != Some(UserRole::Provider) {
            return Err(AppError::authorization(
                "Only provider accounts can register a provider",
            ));
        }
        if input.name.trim().is_empty() {
            return Err(AppError::validation("Provider name is required"));
        }
        let contact_email = input
            .contact_email
            .or_else(|| ctx.email.clone())
            .filter(|e| e.contains('@'))
            .ok_or_else(|| AppError::validation("A valid contact email is required"))?;

        let provider = self
            .providers
            .create(&ActivityProvider::new(
                user_id,
                &input.name,
                input.description,
                &contact_email,
            ))
            .await?;

        info!(provider_id = %provider.id, user_id = %user_id, "Provider registered");
        Ok(provider)
    }

    /// A provider by id.
    pub async fn get_provider(&self, provider_id: Uuid) -> AppResult<ActivityProvider> {
        load_provider(self.providers.as_ref(), provider_id).await
    }

    /// All providers, newest first.
    pub async fn list_providers(
        &self,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivityProvider>> {
        self.providers.find_all(page).await
    }

    /// Providers owned by the caller.
    pub async fn list_my_providers(&self, ctx: &RequestContext) -> AppResult<Vec<ActivityProvider>> {
        let user_id = ctx.require_user()?;
        self.providers.find_by_owner(user_id).await
    }

    /// Edit a provider. Owner or admin.
    pub async fn update_provider(
        &self,
        ctx: &RequestContext,
        provider_id: Uuid,
        input: UpdateProvider,
    ) -> AppResult<ActivityProvider> {
        let mut provider = managed_provider(self.providers.as_ref(), ctx, provider_id).await?;

        if let Some(name) = &input.name
            && name.trim().is_empty()
        {
            return Err(AppError::validation("Provider name cannot be empty"));
        }
        if let Some(email) = &input.contact_email
            && !email.contains('@')
        {
            return Err(AppError::validation("Invalid contact email"));
        }

        provider.update_details(input.name, input.description, input.contact_email);
        let provider = self.providers.update(&provider).await?;

        info!(provider_id = %provider.id, "Provider updated");
        Ok(provider)
    }

    /// Mark a provider as verified. Admin only.
    pub async fn verify_provider(
        &self,
        ctx: &RequestContext,
        provider_id: Uuid,
    ) -> AppResult<ActivityProvider> {
        let admin_id = ctx.require_admin()?;
        let mut provider = load_provider(self.providers.as_ref(), provider_id).await?;
        provider.verify()?;
        let provider = self.providers.update(&provider).await?;

        info!(provider_id = %provider.id, admin_id = %admin_id, "Provider verified");
        Ok(provider)
    }
}
