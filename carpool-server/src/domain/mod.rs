//! Core domain types for carpool planning.
//!
//! These types are independent of the routing provider and of the HTTP
//! layer. They describe who travels, where they start, and how they are
//! grouped into cars.

mod coordinate;
mod error;
mod group;
mod participant;
mod time;

pub use coordinate::Coordinate;
pub use error::DomainError;
pub use group::Group;
pub use participant::{Participant, ParticipantId};
pub use time::TravelTime;
