//! Request and response types for the HTTP API.

pub mod analytics;
pub mod health;
pub mod shorten;
