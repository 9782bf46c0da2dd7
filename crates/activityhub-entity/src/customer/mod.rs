//! Customer profile entity.

pub mod model;

pub use model::Customer;
