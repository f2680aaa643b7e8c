//! Registry backends. Exactly one is live at a time, selected at startup.

mod memory_registry;
mod pg_registry;

pub use memory_registry::MemoryRegistry;
pub use pg_registry::PgRegistry;
