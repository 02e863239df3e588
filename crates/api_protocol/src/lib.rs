//! HTTP API definitions for LifeAlign
//!
//! This crate defines the JSON bodies exchanged between the LifeAlign server
//! and its clients, the validation applied to incoming requests, and the
//! error envelope returned on failure.

mod error;
pub mod requests;
pub mod responses;
mod validation;

pub use error::*;
pub use validation::*;
