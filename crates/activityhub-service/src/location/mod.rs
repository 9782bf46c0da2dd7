//! Location requests and approved locations.

pub mod service;

pub use service::LocationService;
