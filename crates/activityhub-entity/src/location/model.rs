//! Location entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::request::LocationRequest;

/// An approved venue activities can be held at.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    /// Unique location identifier.
    pub id: Uuid,
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
    /// When the location was created.
    pub created_at: DateTime<Utc>,
    /// Approving admin.
    pub created_by: Uuid,
}

impl Location {
    /// Build a location from an approved request's details.
    pub fn from_request(request: &LocationRequest, admin_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: request.name.clone(),
            address: request.address.clone(),
            city: request.city.clone(),
            country: request.country.clone(),
            latitude: request.latitude,
            longitude: request.longitude,
            created_at: Utc::now(),
            created_by: admin_id,
        }
    }
}
