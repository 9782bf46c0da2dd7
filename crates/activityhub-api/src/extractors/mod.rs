//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod pagination;
pub mod path;

pub use auth::CurrentUser;
pub use json::ValidatedJson;
pub use pagination::{ActivityListParams, PaginationParams};
pub use path::parse_uuid;
