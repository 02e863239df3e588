//! Core entity definitions for LifeAlign.
//!
//! This crate defines the data model shared by the store, the rule engine and
//! the HTTP layer: users, blueprints, habits and their completions, daily
//! check-ins, self and progress assessments, recommendations, accountability
//! buddies and community updates.

mod assessment;
mod blueprint;
mod buddy;
mod category;
mod checkin;
mod community;
mod habit;
mod recommendation;
mod streak;
mod user;

pub use assessment::*;
pub use blueprint::*;
pub use buddy::*;
pub use category::*;
pub use checkin::*;
pub use community::*;
pub use habit::*;
pub use recommendation::*;
pub use streak::*;
pub use user::*;
