//! Customer self-service profile.

pub mod service;

pub use service::{CustomerService, UpdateCustomerProfile};
