//! Caching layer for routing lookups.
//!
//! Subset search asks for the same coordinate pairs over and over, within
//! a round and across rounds. Every answer is memoized here so that each
//! distinct address or pair costs at most one upstream call while cached.
//! Concurrent misses on the same key share a single upstream call.
//!
//! A pair is cached as a whole route, so its duration and its distance
//! come from the same request.
//!
//! Errors are never cached: a transient failure should not poison later
//! requests.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::Coordinate;
use crate::oracle::{DistanceOracle, OracleError, RouteSummary};

/// Cache key for pairwise lookups: (from, to). Direction matters.
type PairKey = (Coordinate, Coordinate);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries. `None` keeps entries until evicted by size.
    pub ttl: Option<Duration>,

    /// Maximum number of cached addresses.
    pub geocode_capacity: u64,

    /// Maximum number of cached routes.
    pub route_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Some(Duration::from_secs(24 * 60 * 60)),
            geocode_capacity: 1024,
            route_capacity: 8192,
        }
    }
}

fn build_cache<K, V>(capacity: u64, ttl: Option<Duration>) -> MokaCache<K, V>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    let builder = MokaCache::builder().max_capacity(capacity);
    match ttl {
        Some(ttl) => builder.time_to_live(ttl).build(),
        None => builder.build(),
    }
}

/// Routing oracle with memoization.
///
/// Wraps any [`DistanceOracle`] and is itself one, so the matcher does not
/// know whether it is talking to a cache. `travel_time` and
/// `travel_distance` are answered from the cached route.
pub struct CachedOracle<O> {
    inner: O,
    /// Coordinates keyed by trimmed address.
    geocodes: MokaCache<String, Coordinate>,
    routes: MokaCache<PairKey, RouteSummary>,
}

impl<O: DistanceOracle> CachedOracle<O> {
    /// Create a new cached oracle.
    pub fn new(inner: O, config: &CacheConfig) -> Self {
        Self {
            inner,
            geocodes: build_cache(config.geocode_capacity, config.ttl),
            routes: build_cache(config.route_capacity, config.ttl),
        }
    }

    /// Access the underlying oracle for operations that bypass the cache.
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: DistanceOracle> DistanceOracle for CachedOracle<O> {
    async fn geocode(&self, address: &str) -> Result<Coordinate, OracleError> {
        let key = address.trim().to_string();
        self.geocodes
            .try_get_with(key.clone(), self.inner.geocode(&key))
            .await
            .map_err(OracleError::from)
    }

    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteSummary, OracleError> {
        self.routes
            .try_get_with((from, to), self.inner.route(from, to))
            .await
            .map_err(OracleError::from)
    }

    async fn ping(&self) -> Result<u16, OracleError> {
        self.inner.ping().await
    }
}
