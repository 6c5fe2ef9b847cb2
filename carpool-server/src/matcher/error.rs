//! Planning error types.

use crate::domain::DomainError;
use crate::oracle::OracleError;

use super::config::InvalidConfig;

/// Error from carpool planning.
///
/// Matching adds no failure modes of its own: routing failures are passed
/// through unchanged, and the request is abandoned without partial groups.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Geocoding or routing failed
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Inconsistent input data
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration out of range
    #[error(transparent)]
    Config(#[from] InvalidConfig),

    /// Invalid planning request
    #[error("invalid plan request: {0}")]
    InvalidRequest(String),
}
