//! In-app notifications.

pub mod service;

pub use service::NotificationService;
