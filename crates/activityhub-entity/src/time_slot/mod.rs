//! Bookable time slot entity.

pub mod model;

pub use model::TimeSlot;
