//! Gift card sales and balance checks.

pub mod code;
pub mod service;

pub use service::{GiftCardBalance, GiftCardService};
