//! Activity domain entities.

pub mod model;
pub mod status;

pub use model::{Activity, ActivityDetails, MAX_PRICE_CENTS};
pub use status::ActivityStatus;
