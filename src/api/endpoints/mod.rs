//! HTTP endpoint handlers, grouped by surface.

pub mod forms;
pub mod geo;
pub mod health;
pub mod quote;
