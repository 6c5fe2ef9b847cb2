//! Carpool groups ("trajets").

use super::{ParticipantId, TravelTime};

/// One car: a driver and the riders picked up on the way.
///
/// Riders are visited in the order stored here; the order is the one in
/// which the matcher enumerated them and is not optimised further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub driver: ParticipantId,
    pub riders: Vec<ParticipantId>,
    /// Chained duration driver → riders → destination.
    pub total_duration: TravelTime,
}

impl Group {
    pub fn new(driver: ParticipantId, riders: Vec<ParticipantId>, total_duration: TravelTime) -> Self {
        Self {
            driver,
            riders,
            total_duration,
        }
    }

    /// A driver travelling alone.
    pub fn solo(driver: ParticipantId, direct: TravelTime) -> Self {
        Self::new(driver, Vec::new(), direct)
    }

    pub fn rider_count(&self) -> usize {
        self.riders.len()
    }

    pub fn is_solo(&self) -> bool {
        self.riders.is_empty()
    }

    /// Driver first, then riders in visiting order.
    pub fn members(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        std::iter::once(self.driver).chain(self.riders.iter().copied())
    }
}
