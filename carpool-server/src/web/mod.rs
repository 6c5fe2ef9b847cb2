//! Web layer for the carpool planner.
//!
//! Provides HTTP endpoints for planning carpools and printing reports.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
