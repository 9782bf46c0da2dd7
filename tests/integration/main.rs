//! HTTP-level integration tests against the in-memory backend.

mod helpers;

mod auth_test;
mod booking_test;
mod catalog_test;
mod gift_card_test;
mod location_test;
