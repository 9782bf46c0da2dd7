//! Core type definitions used across the ActivityHub workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
