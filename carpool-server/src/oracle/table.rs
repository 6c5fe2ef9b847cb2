//! In-memory routing oracle.
//!
//! Serves coordinates, durations and distances from tables filled in
//! advance. This is useful for testing the matcher without network access,
//! and it counts every lookup so tests can assert on call volume. An
//! optional latency makes lookups overlap the way real requests do.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::{Coordinate, TravelTime};

use super::DistanceOracle;
use super::error::OracleError;
use super::types::RouteSummary;

/// Oracle backed by lookup tables.
///
/// Places are registered by address; durations and distances are
/// registered between two addresses. Lookups for unregistered pairs (or
/// for coordinates that belong to no registered place) fall back to the
/// configured default, or fail with [`OracleError::Unavailable`] if there
/// is none.
///
/// # Examples
///
/// ```
/// use carpool_server::domain::Coordinate;
/// use carpool_server::oracle::{DistanceOracle, TableOracle};
///
/// # tokio_test_block_on(async {
/// let oracle = TableOracle::new()
///     .with_place("A", Coordinate::new(0.0, 0.0).unwrap())
///     .with_place("DEST", Coordinate::new(0.1, 0.0).unwrap())
///     .with_duration("A", "DEST", 600);
///
/// let a = oracle.geocode("A").await.unwrap();
/// let dest = oracle.geocode("DEST").await.unwrap();
/// assert_eq!(oracle.travel_time(a, dest).await.unwrap().as_secs(), 600);
/// assert_eq!(oracle.duration_calls(), 1);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Default)]
pub struct TableOracle {
    places: HashMap<String, Coordinate>,
    names: HashMap<Coordinate, String>,
    durations: HashMap<(String, String), TravelTime>,
    distances: HashMap<(String, String), f64>,
    default_duration: Option<TravelTime>,
    default_distance_km: Option<f64>,
    failing_pairs: HashSet<(String, String)>,
    unreachable: bool,
    latency: Option<Duration>,
    geocode_calls: AtomicUsize,
    route_calls: AtomicUsize,
    duration_calls: AtomicUsize,
    distance_calls: AtomicUsize,
}

impl TableOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an address and its coordinate.
    pub fn with_place(mut self, address: impl Into<String>, coord: Coordinate) -> Self {
        let address = address.into();
        self.names.insert(coord, address.clone());
        self.places.insert(address, coord);
        self
    }

    /// Register the driving time from one address to another.
    pub fn with_duration(mut self, from: &str, to: &str, secs: u64) -> Self {
        self.durations
            .insert(pair(from, to), TravelTime::from_secs(secs));
        self
    }

    /// Register the driving distance from one address to another.
    pub fn with_distance(mut self, from: &str, to: &str, km: f64) -> Self {
        self.distances.insert(pair(from, to), km);
        self
    }

    /// Duration returned for pairs with no explicit entry.
    pub fn with_default_duration(mut self, secs: u64) -> Self {
        self.default_duration = Some(TravelTime::from_secs(secs));
        self
    }

    /// Distance returned for pairs with no explicit entry.
    pub fn with_default_distance(mut self, km: f64) -> Self {
        self.default_distance_km = Some(km);
        self
    }

    /// Make every lookup between two addresses fail.
    pub fn with_failure(mut self, from: &str, to: &str) -> Self {
        self.failing_pairs.insert(pair(from, to));
        self
    }

    /// Make `ping` fail.
    pub fn with_unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Sleep this long in every lookup before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::Relaxed)
    }

    pub fn route_calls(&self) -> usize {
        self.route_calls.load(Ordering::Relaxed)
    }

    pub fn duration_calls(&self) -> usize {
        self.duration_calls.load(Ordering::Relaxed)
    }

    pub fn distance_calls(&self) -> usize {
        self.distance_calls.load(Ordering::Relaxed)
    }

    /// Address names for a coordinate pair, if both are registered places.
    fn names_of(&self, from: Coordinate, to: Coordinate) -> Option<(String, String)> {
        Some((self.names.get(&from)?.clone(), self.names.get(&to)?.clone()))
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn lookup_duration(&self, from: Coordinate, to: Coordinate) -> Result<TravelTime, OracleError> {
        let key = self.names_of(from, to);
        if let Some(key) = &key
            && self.failing_pairs.contains(key)
        {
            return Err(no_route(from, to));
        }
        if from == to {
            return Ok(TravelTime::ZERO);
        }
        key.and_then(|k| self.durations.get(&k).copied())
            .or(self.default_duration)
            .ok_or_else(|| no_route(from, to))
    }

    fn lookup_distance(&self, from: Coordinate, to: Coordinate) -> Result<f64, OracleError> {
        let key = self.names_of(from, to);
        if let Some(key) = &key
            && self.failing_pairs.contains(key)
        {
            return Err(no_route(from, to));
        }
        if from == to {
            return Ok(0.0);
        }
        key.and_then(|k| self.distances.get(&k).copied())
            .or(self.default_distance_km)
            .ok_or_else(|| no_route(from, to))
    }
}

fn pair(from: &str, to: &str) -> (String, String) {
    (from.to_string(), to.to_string())
}

fn no_route(from: Coordinate, to: Coordinate) -> OracleError {
    OracleError::Unavailable(format!("no route from {from:?} to {to:?}"))
}

impl DistanceOracle for TableOracle {
    async fn geocode(&self, address: &str) -> Result<Coordinate, OracleError> {
        self.geocode_calls.fetch_add(1, Ordering::Relaxed);
        self.delay().await;
        self.places
            .get(address.trim())
            .copied()
            .ok_or_else(|| OracleError::AddressNotFound {
                address: address.to_string(),
            })
    }

    /// Needs both a duration and a distance for the pair.
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteSummary, OracleError> {
        self.route_calls.fetch_add(1, Ordering::Relaxed);
        self.delay().await;
        Ok(RouteSummary {
            duration: self.lookup_duration(from, to)?,
            distance_km: self.lookup_distance(from, to)?,
        })
    }

    // The single-value lookups read one table each, so tests that only
    // care about durations need not register distances.
    async fn travel_time(&self, from: Coordinate, to: Coordinate) -> Result<TravelTime, OracleError> {
        self.duration_calls.fetch_add(1, Ordering::Relaxed);
        self.delay().await;
        self.lookup_duration(from, to)
    }

    async fn travel_distance(&self, from: Coordinate, to: Coordinate) -> Result<f64, OracleError> {
        self.distance_calls.fetch_add(1, Ordering::Relaxed);
        self.delay().await;
        self.lookup_distance(from, to)
    }

    async fn ping(&self) -> Result<u16, OracleError> {
        if self.unreachable {
            return Err(OracleError::Unavailable("table marked unreachable".to_string()));
        }
        Ok(204)
    }
}
