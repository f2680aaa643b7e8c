//! Business logic services orchestrating validation, code allocation, and
//! the registry.

mod analytics_service;
mod redirect_service;
mod shorten_service;

pub use analytics_service::AnalyticsService;
pub use redirect_service::{RedirectError, RedirectService};
pub use shorten_service::{ShortenOutcome, ShortenService};
