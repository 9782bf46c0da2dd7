//! # activityhub-api
//!
//! HTTP API layer for ActivityHub built on Axum.
//!
//! Provides the REST endpoints under `/api`, middleware (CORS, request
//! logging, tracing, timeouts, body limits), extractors, DTOs, and the
//! mapping from [`AppError`](activityhub_core::AppError) to the JSON
//! failure envelope.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
