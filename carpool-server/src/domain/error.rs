//! Domain error types.
//!
//! These errors represent validation failures and inconsistent inputs in
//! the domain layer. They are distinct from routing provider errors.

use super::ParticipantId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Latitude or longitude outside the valid range, or not finite
    #[error("invalid coordinate: lng {lng}, lat {lat}")]
    InvalidCoordinate { lng: f64, lat: f64 },

    /// A participant id has no coordinate or direct duration
    #[error("no routing data for participant {0}")]
    UnknownParticipant(ParticipantId),

    /// A required text field was blank
    #[error("{0} must not be blank")]
    BlankField(&'static str),
}
