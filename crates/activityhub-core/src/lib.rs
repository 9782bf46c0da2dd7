//! # activityhub-core
//!
//! Core crate for ActivityHub. Contains configuration schemas and startup
//! validation, the unified error system, pagination types, the generic
//! repository trait, and the traits for outbound collaborators (payments,
//! email, loyalty, analytics, gift-card validation).
//!
//! This crate has **no** internal dependencies on other ActivityHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
