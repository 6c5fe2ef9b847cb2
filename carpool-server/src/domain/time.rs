//! Travel durations.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// A road travel duration, in whole seconds.
///
/// Routing providers report leg durations as integer seconds, and the
/// detour comparisons in matching are made against those exact values.
///
/// # Examples
///
/// ```
/// use carpool_server::domain::TravelTime;
///
/// let leg = TravelTime::from_secs(600) + TravelTime::from_secs(300);
/// assert_eq!(leg.as_secs(), 900);
/// assert_eq!(leg.to_string(), "15min");
/// assert_eq!(TravelTime::from_secs(3900).to_string(), "1h 05min");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TravelTime(u64);

impl TravelTime {
    pub const ZERO: TravelTime = TravelTime(0);

    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Whether this duration is within `factor` times `reference`.
    ///
    /// This is the detour test: a trip may take at most `factor` times the
    /// driver's solo trip.
    pub fn within_factor_of(&self, reference: TravelTime, factor: f64) -> bool {
        self.0 as f64 <= factor * reference.0 as f64
    }
}

impl Add for TravelTime {
    type Output = TravelTime;

    fn add(self, rhs: TravelTime) -> TravelTime {
        TravelTime(self.0.saturating_add(rhs.0))
    }
}

impl Sum for TravelTime {
    fn sum<I: Iterator<Item = TravelTime>>(iter: I) -> Self {
        iter.fold(TravelTime::ZERO, Add::add)
    }
}

impl fmt::Display for TravelTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Round to the nearest minute for display.
        let mins = (self.0 + 30) / 60;
        if mins >= 60 {
            write!(f, "{}h {:02}min", mins / 60, mins % 60)
        } else {
            write!(f, "{mins}min")
        }
    }
}
