//! Request handlers, one module per resource.

pub mod activity;
pub mod auth;
pub mod booking;
pub mod customer;
pub mod gift_card;
pub mod health;
pub mod location;
pub mod notification;
pub mod provider;
pub mod time_slot;
pub mod wishlist;
