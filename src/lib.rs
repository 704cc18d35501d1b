//! Lead-capture backend for a junk-removal brokerage.
//!
//! A visitor photographs their junk pile; a vision model turns the photo
//! into an editable item list; a text model prices the confirmed list
//! against a fixed rubric; and the resulting quote carries into a booking
//! form. Manual catalog entry, contact and provider-signup forms, and
//! address/ZIP lookups round out the funnel. Everything external sits
//! behind a trait seam so the whole surface tests against mocks.

pub mod api;
pub mod config;
pub mod forms;
pub mod geo;
pub mod models;
pub mod persist;
pub mod pipeline;
pub mod quote;
