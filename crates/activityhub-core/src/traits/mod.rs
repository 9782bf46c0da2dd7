//! Core traits defined in `activityhub-core` and implemented by other crates.

pub mod integrations;
pub mod repository;

pub use integrations::{
    AnalyticsService, EmailMessage, EmailSender, GiftCardValidation, GiftCardValidator,
    LoyaltyService, PaymentCharge, PaymentGateway,
};
pub use repository::Repository;
