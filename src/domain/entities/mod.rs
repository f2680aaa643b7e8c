//! Core business entities.

mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord};
