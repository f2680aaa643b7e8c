//! Infrastructure layer: storage backends and maintenance tasks.

pub mod persistence;
pub mod sweeper;
