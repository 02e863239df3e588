//! Bearer-token identity for LifeAlign.
//!
//! Tokens are issued by an external identity provider; this crate only
//! signs test tokens and validates incoming ones.

mod error;
mod jwt;

pub use error::*;
pub use jwt::*;

/// Default JWT expiration time in hours.
pub const DEFAULT_JWT_EXPIRATION_HOURS: u64 = 24;

/// Default JWT issuer.
pub const DEFAULT_JWT_ISSUER: &str = "lifealign";
