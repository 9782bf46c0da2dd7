//! Activity provider entity.

pub mod model;

pub use model::ActivityProvider;
