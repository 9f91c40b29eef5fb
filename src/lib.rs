//! overload - Progressive overload planner
//!
//! Next-session targets for 5/3/1, linear progression, GZCLP and the Texas
//! Method, coaching feedback on finished sessions, and plate math that turns
//! any target into a loadable bar.

pub mod analysis;
pub mod config;
pub mod db;
pub mod error;
pub mod exercises;
pub mod feedback;
pub mod plates;
pub mod progression;
pub mod session;
pub mod tips;
pub mod units;

pub use db::Database;
pub use error::{PlanError, Result};
