//! Geographic coordinates.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::DomainError;

/// A geocoded location as a (longitude, latitude) pair in degrees.
///
/// Coordinates are used as cache keys for routing lookups, so equality and
/// hashing are defined on the exact bit pattern of both components (with
/// `-0.0` folded into `0.0`). Construction rejects non-finite and
/// out-of-range values, so `NaN` never reaches a key.
///
/// # Examples
///
/// ```
/// use carpool_server::domain::Coordinate;
///
/// let paris = Coordinate::new(2.3522, 48.8566).unwrap();
/// assert_eq!(paris.to_lat_lng_param(), "48.8566,2.3522");
///
/// assert!(Coordinate::new(181.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy)]
pub struct Coordinate {
    lng: f64,
    lat: f64,
}

impl Coordinate {
    /// Create a coordinate from longitude and latitude.
    pub fn new(lng: f64, lat: f64) -> Result<Self, DomainError> {
        let valid = lng.is_finite()
            && lat.is_finite()
            && (-180.0..=180.0).contains(&lng)
            && (-90.0..=90.0).contains(&lat);
        if !valid {
            return Err(DomainError::InvalidCoordinate { lng, lat });
        }

        // Fold negative zero so that equal coordinates hash equally.
        Ok(Self {
            lng: lng + 0.0,
            lat: lat + 0.0,
        })
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Format as `"lat,lng"`, the order routing APIs expect in query strings.
    pub fn to_lat_lng_param(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.lng.to_bits() == other.lng.to_bits() && self.lat.to_bits() == other.lat.to_bits()
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lng.to_bits().hash(state);
        self.lat.to_bits().hash(state);
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate(lng {}, lat {})", self.lng, self.lat)
    }
}
