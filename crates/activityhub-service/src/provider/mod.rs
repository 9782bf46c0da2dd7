//! Activity provider registration and moderation.

pub mod service;

pub use service::{NewProvider, ProviderService, UpdateProvider};
