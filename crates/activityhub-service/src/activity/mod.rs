//! Activity listings.

pub mod service;

pub use service::{ActivityService, NewActivity};
