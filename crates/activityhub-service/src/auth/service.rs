//! Account registration and credential checks.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use activityhub_auth::{JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator, TokenPair};
use activityhub_core::error::AppError;
use activityhub_core::result::AppResult;
use activityhub_core::traits::Repository;
use activityhub_database::traits::{CustomerStore, UserStore};
use activityhub_entity::customer::Customer;
use activityhub_entity::user::{User, UserRole};

use crate::context::RequestContext;

/// Self-registration input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
    /// Full name.
    pub full_name: String,
    /// Requested role (customer or provider).
    pub role: UserRole,
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// The logged-in user.
    pub user: User,
    /// Freshly issued tokens.
    pub tokens: TokenPair,
}

/// Handles accounts and tokens.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    customers: Arc<dyn CustomerStore>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        users: Arc<dyn UserStore>,
        customers: Arc<dyn CustomerStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
    ) -> Self {
        Self {
            users,
            customers,
            hasher,
            validator,
            encoder,
            decoder,
        }
    }

    /// Register a customer or provider account.
    ///
    /// Customers also get an empty customer profile.
    pub async fn register(&self, input: RegisterInput) -> AppResult<User> {
        if !input.role.is_self_service() {
            return Err(AppError::validation(format!(
                "Role '{}' cannot be self-registered",
                input.role
            )));
        }
        let user = self
            .create_user(&input.email, &input.password, &input.full_name, input.role)
            .await?;

        if user.role == UserRole::Customer {
            self.customers
                .create(&Customer::new(user.id, &user.full_name))
                .await?;
        }

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Create an administrator account.
    pub async fn create_admin(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> AppResult<User> {
        let user = self
            .create_user(email, password, full_name, UserRole::Admin)
            .await?;
        info!(user_id = %user.id, "Administrator created");
        Ok(user)
    }

    /// Check credentials and issue a token pair.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let invalid = || AppError::authentication("Invalid email or password");

        let mut user = self.users.find_by_email(email).await?.ok_or_else(invalid)?;
        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(invalid());
        }
        if !user.can_login() {
            return Err(AppError::authentication("Account is disabled"));
        }

        user.record_login();
        let user = self.users.update(&user).await?;
        let tokens = self
            .encoder
            .generate_token_pair(user.id, user.role, &user.email)?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginResult { user, tokens })
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// The role is re-read from the store so role changes take effect.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.decoder.decode_refresh_token(refresh_token)?;
        let user = self
            .users
            .find_by_id(&claims.user_id())
            .await?
            .filter(|u| u.can_login())
            .ok_or_else(|| AppError::authentication("Account is no longer active"))?;

        self.encoder
            .generate_token_pair(user.id, user.role, &user.email)
    }

    /// The caller's account.
    pub async fn current_user(&self, ctx: &RequestContext) -> AppResult<User> {
        let user_id = ctx.require_user()?;
        self.users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn create_user(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: UserRole,
    ) -> AppResult<User> {
        let email = email.trim();
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(AppError::validation("Invalid email format"));
        }
        if full_name.trim().is_empty() {
            return Err(AppError::validation("Full name is required"));
        }
        self.validator.validate(password)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let hash = self.hasher.hash_password(password)?;
        self.users
            .create(&User::new(email, hash, full_name, role))
            .await
    }
}

#[cfg(test)]
mod tests {
    use activityhub_core::ErrorKind;

    use super::*;
    use crate::testing::Fixture;

    fn input(email: &str, role: UserRole) -> RegisterInput {
        RegisterInput {
            email: email.into(),
            password: "hunter2hunter2".into(),
            full_name: "Ada Lovelace".into(),
            role,
        }
    }

    #[tokio::test]
    async fn test_register_customer_creates_profile() {
        let fx = Fixture::new();
        let user = fx
            .services
            .auth
            .register(input("ada@example.com", UserRole::Customer))
            .await
            .expect("register");

        let profile = fx.stores.customers.find_by_user(user.id).await.expect("query");
        assert!(profile.is_some());
    }

    #[tokio::test]
    async fn test_register_rejects_admin_and_duplicates() {
        let fx = Fixture::new();
        let err = fx
            .services
            .auth
            .register(input("root@example.com", UserRole::Admin))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        fx.services
            .auth
            .register(input("dup@example.com", UserRole::Provider))
            .await
            .expect("first");
        let err = fx
            .services
            .auth
            .register(input("DUP@example.com", UserRole::Customer))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_login_and_refresh() {
        let fx = Fixture::new();
        fx.services
            .auth
            .register(input("grace@example.com", UserRole::Customer))
            .await
            .expect("register");

        let err = fx
            .services
            .auth
            .login("grace@example.com", "wrong-password-1")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);

        let result = fx
            .services
            .auth
            .login("grace@example.com", "hunter2hunter2")
            .await
            .expect("login");
        assert!(result.user.last_login_at.is_some());

        let pair = fx
            .services
            .auth
            .refresh(&result.tokens.refresh_token)
            .await
            .expect("refresh");
        assert!(!pair.access_token.is_empty());

        let err = fx
            .services
            .auth
            .refresh(&result.tokens.access_token)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_current_user_requires_authentication() {
        let fx = Fixture::new();
        let err = fx
            .services
            .auth
            .current_user(&RequestContext::anonymous("test"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
