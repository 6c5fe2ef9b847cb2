//! Geocoding and road routing.
//!
//! The matcher never talks to a routing provider directly. It asks a
//! [`DistanceOracle`] where an address is (`geocode`) and for the road
//! route between two points (`route`), from which the drive time
//! (`travel_time`) and length (`travel_distance`, used for CO2 only) are
//! read. A connectivity probe (`ping`) serves diagnostics.
//!
//! [`GoogleMapsClient`] answers from the Google Geocoding and Directions
//! APIs. [`TableOracle`] answers from an in-memory table, for tests and
//! offline runs. Wrap either in [`CachedOracle`](crate::cache::CachedOracle)
//! to memoize lookups.

mod client;
mod error;
mod table;
mod types;

use std::future::Future;

use crate::domain::{Coordinate, TravelTime};

pub use client::{GoogleMapsClient, GoogleMapsConfig};
pub use error::OracleError;
pub use table::TableOracle;
pub use types::{DirectionsResponse, GeocodeResponse, RouteSummary};

/// Source of coordinates, durations and distances.
///
/// Implementations must be deterministic for identical inputs within the
/// lifetime of a cache entry, since results are memoized.
pub trait DistanceOracle: Send + Sync {
    /// Resolve an address to a coordinate.
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Coordinate, OracleError>> + Send;

    /// Driving time and distance from `from` to `to`.
    fn route(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<RouteSummary, OracleError>> + Send;

    /// Driving time from `from` to `to`.
    fn travel_time(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<TravelTime, OracleError>> + Send {
        async move { Ok(self.route(from, to).await?.duration) }
    }

    /// Driving distance from `from` to `to`, in kilometres.
    fn travel_distance(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<f64, OracleError>> + Send {
        async move { Ok(self.route(from, to).await?.distance_km) }
    }

    /// Check that the provider is reachable. Returns an HTTP status code.
    fn ping(&self) -> impl Future<Output = Result<u16, OracleError>> + Send;
}
