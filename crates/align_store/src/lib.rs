//! Storage layer for LifeAlign.
//!
//! The [`AlignStore`] trait is the persistence seam used by the server. Two
//! implementations are provided: [`MemoryAlignStore`] for development and
//! tests, and [`SqliteAlignStore`] for durable deployments.

#[cfg(test)]
mod conformance;
mod error;
mod memory;
mod seed;
mod sqlite;
mod traits;

pub use error::*;
pub use memory::*;
pub use seed::*;
pub use sqlite::*;
pub use traits::*;
