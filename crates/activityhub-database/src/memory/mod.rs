//! In-memory store implementations backed by `DashMap`.
//!
//! Used for local development (`database.provider = "memory"`) and by the
//! service and API test suites. Every aggregate gets a [`MemoryStore`]
//! table; bookings wrap theirs together with the time slot table so seat
//! reservation and the booking write happen under one slot lock.

pub mod booking;
pub mod records;
pub mod table;

pub use booking::MemoryBookingStore;
pub use table::{MemoryRecord, MemoryStore};
