//! Application state for the web layer.

use std::sync::Arc;

use crate::matcher::MatchConfig;

/// Shared application state.
///
/// Generic over the routing oracle so the same router serves the cached
/// Google Maps client in production and in-memory tables in tests.
pub struct AppState<O> {
    /// Routing oracle, usually a cached Google Maps client
    pub oracle: Arc<O>,

    /// Matching configuration
    pub config: Arc<MatchConfig>,

    /// Logo for reports that do not name one
    pub logo_url: Arc<str>,
}

impl<O> AppState<O> {
    /// Create a new app state.
    pub fn new(oracle: O, config: MatchConfig, logo_url: impl Into<Arc<str>>) -> Self {
        Self {
            oracle: Arc::new(oracle),
            config: Arc::new(config),
            logo_url: logo_url.into(),
        }
    }
}

impl<O> Clone for AppState<O> {
    fn clone(&self) -> Self {
        Self {
            oracle: Arc::clone(&self.oracle),
            config: Arc::clone(&self.config),
            logo_url: Arc::clone(&self.logo_url),
        }
    }
}
