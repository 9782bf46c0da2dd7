//! Request DTOs with validation rules.
//!
//! Bodies are checked by [`ValidatedJson`](crate::extractors::ValidatedJson)
//! before they reach a handler. Business rules that need stored state stay
//! in the services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use activityhub_entity::activity::ActivityDetails;
use activityhub_entity::location::NewLocationRequest;
use activityhub_entity::user::UserRole;
use activityhub_service::{
    CreateBooking, NewActivity, NewProvider, NewTimeSlot, RegisterInput, UpdateCustomerProfile,
    UpdateProvider,
};

/// Register request.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    /// Email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Full name.
    #[validate(length(min = 1, max = 200, message = "Full name must be 1-200 characters"))]
    pub full_name: String,
    /// Requested role, `customer` when omitted.
    #[serde(default = "default_role")]
    pub role: UserRole,
}

fn default_role() -> UserRole {
    UserRole::Customer
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            role: req.role,
        }
    }
}

/// Login request.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    /// Email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Refresh token request.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Update own customer profile.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct UpdateCustomerRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    /// Phone number.
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

impl From<UpdateCustomerRequest> for UpdateCustomerProfile {
    fn from(req: UpdateCustomerRequest) -> Self {
        Self {
            display_name: req.display_name,
            phone: req.phone,
        }
    }
}

/// Register a provider.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateProviderRequest {
    /// Business name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Description.
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    /// Contact email, the caller's email when omitted.
    #[validate(email)]
    pub contact_email: Option<String>,
}

impl From<CreateProviderRequest> for NewProvider {
    fn from(req: CreateProviderRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            contact_email: req.contact_email,
        }
    }
}

/// Edit a provider.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct UpdateProviderRequest {
    /// Business name.
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// Description.
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    /// Contact email.
    #[validate(email)]
    pub contact_email: Option<String>,
}

impl From<UpdateProviderRequest> for UpdateProvider {
    fn from(req: UpdateProviderRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            contact_email: req.contact_email,
        }
    }
}

/// Create an activity under a provider.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateActivityRequest {
    /// Title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Description.
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub description: String,
    /// Category.
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    /// Price per participant in cents.
    #[validate(range(min = 0, max = 100_000_000))]
    pub price_cents: i64,
    /// ISO 4217 currency code.
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
    /// Default seats per slot.
    #[validate(range(min = 1, max = 10000))]
    pub capacity: i32,
    /// Approved location.
    pub location_id: Option<Uuid>,
}

impl From<CreateActivityRequest> for NewActivity {
    fn from(req: CreateActivityRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            category: req.category,
            price_cents: req.price_cents,
            currency: req.currency,
            capacity: req.capacity,
            location_id: req.location_id,
        }
    }
}

/// Edit an activity.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct UpdateActivityRequest {
    /// Title.
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// Description.
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    /// Category.
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
    /// Price per participant in cents.
    #[validate(range(min = 0, max = 100_000_000))]
    pub price_cents: Option<i64>,
    /// Default seats per slot.
    #[validate(range(min = 1, max = 10000))]
    pub capacity: Option<i32>,
    /// Location.
    pub location_id: Option<Uuid>,
}

impl From<UpdateActivityRequest> for ActivityDetails {
    fn from(req: UpdateActivityRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            category: req.category,
            price_cents: req.price_cents,
            capacity: req.capacity,
            location_id: req.location_id,
        }
    }
}

/// Add a time slot.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateTimeSlotRequest {
    /// Start.
    pub starts_at: DateTime<Utc>,
    /// End.
    pub ends_at: DateTime<Utc>,
    /// Seats, the activity's capacity when omitted.
    #[validate(range(min = 1, max = 10000))]
    pub capacity: Option<i32>,
}

impl From<CreateTimeSlotRequest> for NewTimeSlot {
    fn from(req: CreateTimeSlotRequest) -> Self {
        Self {
            starts_at: req.starts_at,
            ends_at: req.ends_at,
            capacity: req.capacity,
        }
    }
}

/// Book seats on a slot.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateBookingRequest {
    /// Activity.
    pub activity_id: Uuid,
    /// Slot.
    pub time_slot_id: Uuid,
    /// Seats to reserve.
    #[validate(range(min = 1, max = 100, message = "Participants must be between 1 and 100"))]
    pub participants: i32,
    /// Gift card to redeem.
    #[validate(length(min = 1, max = 64))]
    pub gift_card_code: Option<String>,
}

impl From<CreateBookingRequest> for CreateBooking {
    fn from(req: CreateBookingRequest) -> Self {
        Self {
            activity_id: req.activity_id,
            time_slot_id: req.time_slot_id,
            participants: req.participants,
            gift_card_code: req.gift_card_code,
        }
    }
}

/// Cancel a booking.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct CancelBookingRequest {
    /// Reason shown to the other party.
    #[serde(default)]
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Ask an administrator to approve a venue.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LocationRequestBody {
    /// Venue name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Street address.
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    /// City.
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    /// Country.
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    /// Latitude in degrees.
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

impl From<LocationRequestBody> for NewLocationRequest {
    fn from(req: LocationRequestBody) -> Self {
        Self {
            name: req.name,
            address: req.address,
            city: req.city,
            country: req.country,
            latitude: req.latitude,
            longitude: req.longitude,
        }
    }
}

/// Reject a location request.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RejectLocationRequest {
    /// Reason given to the provider.
    #[validate(length(min = 1, max = 1000, message = "A review note is required"))]
    pub note: String,
}

/// Buy a gift card.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct PurchaseGiftCardRequest {
    /// Face value in cents.
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount_cents: i64,
    /// ISO 4217 currency code.
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
}

/// Issue a complimentary gift card.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct IssueGiftCardRequest {
    /// Face value in cents.
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount_cents: i64,
    /// ISO 4217 currency code.
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
    /// Optional expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_defaults_to_customer() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"ana@example.com","password":"Secret123","full_name":"Ana"}"#,
        )
        .expect("parse");
        assert_eq!(req.role, UserRole::Customer);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_booking_participants_range() {
        let req = CreateBookingRequest {
            activity_id: Uuid::new_v4(),
            time_slot_id: Uuid::new_v4(),
            participants: 0,
            gift_card_code: None,
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("participants"));
    }

    #[test]
    fn test_activity_price_is_capped() {
        let req: CreateActivityRequest = serde_json::from_str(
            r#"{"title":"Kayak","category":"water","price_cents":4611686018427387903,"currency":"EUR","capacity":8}"#,
        )
        .expect("parse");
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("price_cents"));
    }

    #[test]
    fn test_currency_must_be_three_letters() {
        let req = PurchaseGiftCardRequest {
            amount_cents: 5000,
            currency: "EURO".into(),
        };
        assert!(req.validate().is_err());
    }
}
