//! Notification kind enumeration.

use serde::{Deserialize, Serialize};

/// What happened to trigger a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A customer booked one of the provider's activities.
    BookingCreated,
    /// The provider confirmed a booking.
    BookingConfirmed,
    /// Either party cancelled a booking.
    BookingCancelled,
    /// An admin approved a location request.
    LocationApproved,
    /// An admin rejected a location request.
    LocationRejected,
    /// A gift card was issued to the user.
    GiftCard,
    /// System message.
    System,
}

impl NotificationKind {
    /// Return the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BookingCreated => "booking_created",
            Self::BookingConfirmed => "booking_confirmed",
            Self::BookingCancelled => "booking_cancelled",
            Self::LocationApproved => "location_approved",
            Self::LocationRejected => "location_rejected",
            Self::GiftCard => "gift_card",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
