//! Bookable time slots.

pub mod service;

pub use service::{NewTimeSlot, TimeSlotService};
