//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use activityhub_auth::TokenPair;
use activityhub_core::types::pagination::PageResponse;
use activityhub_entity::user::{User, UserRole};

/// Standard API success wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true`.
    pub success: bool,
    /// Response data.
    pub data: T,
    /// Optional message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// Creates a successful response with a message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// Paginated list payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T: Serialize> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total items.
    pub total: u64,
    /// Current page.
    pub page: u64,
    /// Items per page.
    pub per_page: u64,
    /// Total pages.
    pub total_pages: u64,
}

impl<T: Serialize> From<PageResponse<T>> for PaginatedResponse<T> {
    fn from(page: PageResponse<T>) -> Self {
        Self {
            items: page.items,
            total: page.total_items,
            page: page.page,
            per_page: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

/// Public view of a user account.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Email.
    pub email: String,
    /// Full name.
    pub full_name: String,
    /// Role.
    pub role: UserRole,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Last login.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// Login response.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Authenticated user.
    pub user: UserResponse,
    /// Issued tokens.
    pub tokens: TokenPair,
}

/// A bare count.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    /// Count.
    pub count: u64,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Store backend in use.
    pub database: String,
    /// Whether the store answered.
    pub database_healthy: bool,
}
