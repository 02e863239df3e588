//! Rule-based generation for LifeAlign.
//!
//! Every generator here is a pure function of its inputs and a
//! [`TemplateSelection`] strategy: blueprints and habits are picked from fixed
//! template tables, and recommendations come from score-tier and
//! habit/check-in rules. Nothing touches storage.

mod blueprint;
mod error;
mod habits;
mod questions;
mod recommendations;
mod selection;
mod templates;

pub use blueprint::*;
pub use error::*;
pub use habits::*;
pub use questions::*;
pub use recommendations::*;
pub use selection::*;
