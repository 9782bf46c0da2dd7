//! # activityhub-entity
//!
//! Domain entity models for the ActivityHub marketplace. Every struct in
//! this crate is a database table row with audit fields. Aggregates are
//! created through constructor functions and mutated only through named
//! transition methods, each of which guards the current state and returns
//! an `InvalidState` error when the transition is not allowed.

pub mod activity;
pub mod booking;
pub mod customer;
pub mod gift_card;
pub mod location;
pub mod notification;
pub mod provider;
pub mod time_slot;
pub mod user;
pub mod wishlist;
