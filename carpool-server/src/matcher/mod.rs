//! Carpool matching.
//!
//! This module groups participants into cars. It answers: "who drives,
//! and whom do they pick up on the way?"
//!
//! The matcher is greedy across rounds and exhaustive within a round.
//! Vehicle capacity keeps the subset search small, so brute force is
//! affordable and gives the exact best group for each chosen driver.

mod co2;
mod config;
mod error;
mod plan;
mod search;
mod subsets;


pub use co2::{Co2Estimate, GroupCo2, estimate_co2, round_kg};
pub use config::{InvalidConfig, MatchConfig};
pub use error::PlanError;
pub use plan::{CarpoolPlan, plan_carpools};
pub use search::{MatchInput, Matcher, Origin};
pub use subsets::Combinations;
