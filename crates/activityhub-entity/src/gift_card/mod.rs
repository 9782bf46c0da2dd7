//! Gift card entities.

pub mod model;

pub use model::GiftCard;
