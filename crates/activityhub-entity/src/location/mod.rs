//! Location and location request entities.

pub mod model;
pub mod request;

pub use model::Location;
pub use request::{LocationRequest, LocationRequestStatus, NewLocationRequest};
