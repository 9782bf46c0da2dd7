//! # activityhub-database
//!
//! Persistence for ActivityHub: the PostgreSQL pool, embedded migrations,
//! the unit-of-work wrapper, one store trait per aggregate, and two
//! implementations of every store:
//!
//! - **postgres**: hand-written SQL through sqlx
//! - **memory**: process-local `DashMap` tables (default `memory` feature)
//!
//! The backend is selected at runtime from `database.provider`.

pub mod connection;
#[cfg(feature = "memory")]
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod stores;
pub mod traits;
pub mod unit_of_work;

pub use connection::DatabasePool;
pub use stores::Stores;
pub use unit_of_work::UnitOfWork;
