//! Provider-submitted requests for new venues.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use activityhub_core::error::AppError;

/// Review status of a location request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "location_request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LocationRequestStatus {
    /// Waiting for an admin.
    Pending,
    /// Accepted; a location was created.
    Approved,
    /// Declined with a note.
    Rejected,
}

impl LocationRequestStatus {
    /// Return the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for LocationRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LocationRequestStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(AppError::validation(format!(
                "Invalid location request status: '{s}'"
            ))),
        }
    }
}

/// A provider's request to add a venue to the catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LocationRequest {
    /// Unique request identifier.
    pub id: Uuid,
    /// Requesting provider.
    pub provider_id: Uuid,
    /// User that submitted the request.
    pub requested_by: Uuid,
    /// Venue name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Country.
    pub country: String,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Review status.
    pub status: LocationRequestStatus,
    /// Reviewing admin.
    pub reviewed_by: Option<Uuid>,
    /// When the review happened.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Admin note (required on rejection).
    pub review_note: Option<String>,
    /// Location created on approval.
    pub location_id: Option<Uuid>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// When the request was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Inputs for [`LocationRequest::new`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewLocationRequest {
    /// Venue name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Country.
    pub country: String,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
}

impl LocationRequest {
    /// Create a pending request.
    pub fn new(
        provider_id: Uuid,
        requested_by: Uuid,
        input: NewLocationRequest,
    ) -> Result<Self, AppError> {
        for (field, value) in [
            ("name", &input.name),
            ("address", &input.address),
            ("city", &input.city),
            ("country", &input.country),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("Location {field} is required")));
            }
        }
        if let Some(lat) = input.latitude
            && !(-90.0..=90.0).contains(&lat)
        {
            return Err(AppError::validation("Latitude must be between -90 and 90"));
        }
        if let Some(lng) = input.longitude
            && !(-180.0..=180.0).contains(&lng)
        {
            return Err(AppError::validation("Longitude must be between -180 and 180"));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            provider_id,
            requested_by,
            name: input.name.trim().to_string(),
            address: input.address.trim().to_string(),
            city: input.city.trim().to_string(),
            country: input.country.trim().to_string(),
            latitude: input.latitude,
            longitude: input.longitude,
            status: LocationRequestStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_note: None,
            location_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// `pending → approved`, linking the created location.
    pub fn approve(&mut self, admin_id: Uuid, location_id: Uuid) -> Result<(), AppError> {
        self.ensure_pending("approve")?;
        let now = Utc::now();
        self.status = LocationRequestStatus::Approved;
        self.reviewed_by = Some(admin_id);
        self.reviewed_at = Some(now);
        self.location_id = Some(location_id);
        self.updated_at = now;
        Ok(())
    }

    /// `pending → rejected`. A note is required.
    pub fn reject(&mut self, admin_id: Uuid, note: &str) -> Result<(), AppError> {
        self.ensure_pending("reject")?;
        if note.trim().is_empty() {
            return Err(AppError::validation("A review note is required to reject"));
        }
        let now = Utc::now();
        self.status = LocationRequestStatus::Rejected;
        self.reviewed_by = Some(admin_id);
        self.reviewed_at = Some(now);
        self.review_note = Some(note.trim().to_string());
        self.updated_at = now;
        Ok(())
    }

    fn ensure_pending(&self, action: &str) -> Result<(), AppError> {
        if self.status != LocationRequestStatus::Pending {
            return Err(AppError::invalid_state(format!(
                "Cannot {action} a location request that is {} (expected pending)",
                self.status
            )));
        }
        Ok(())
    }
}
