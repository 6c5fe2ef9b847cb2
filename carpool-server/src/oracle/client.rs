//! Google Maps HTTP client.
//!
//! Provides async geocoding and driving-directions lookups. Handles
//! authentication, request limiting and retry with exponential backoff for
//! transient failures (rate limiting, 5xx, connection errors, timeouts).

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::Coordinate;

use super::DistanceOracle;
use super::error::OracleError;
use super::types::{DirectionsResponse, GeocodeResponse, RouteSummary};

/// Default base URL for the Google Maps web services.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Endpoint used to check outbound connectivity.
const DEFAULT_PING_URL: &str = "https://maps.googleapis.com/generate_204";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// HTTP statuses worth retrying.
const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Configuration for the Google Maps client.
#[derive(Debug, Clone)]
pub struct GoogleMapsConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to production Google Maps)
    pub base_url: String,
    /// URL probed by [`GoogleMapsClient::ping`]
    pub ping_url: String,
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,
    /// Time allowed to read a response once connected
    pub read_timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Base backoff; the n-th retry waits `backoff * 2^(n-1)`
    pub backoff: Duration,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
}

impl GoogleMapsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            ping_url: DEFAULT_PING_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
            max_retries: 5,
            backoff: Duration::from_millis(700),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set connect and read timeouts.
    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }

    /// Set retry count and base backoff.
    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.backoff = backoff;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }
}

/// Google Maps API client.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    ping_url: String,
    max_retries: u32,
    backoff: Duration,
    semaphore: Arc<Semaphore>,
}

impl GoogleMapsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GoogleMapsConfig) -> Result<Self, OracleError> {
        // reqwest has no separate read timeout on the whole request, so the
        // overall timeout covers connecting plus reading.
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.connect_timeout + config.read_timeout)
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url,
            ping_url: config.ping_url,
            max_retries: config.max_retries,
            backoff: config.backoff,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Geocode an address to the location of its first result.
    pub async fn geocode_address(&self, address: &str) -> Result<Coordinate, OracleError> {
        let url = format!("{}/geocode/json", self.base_url);
        let response: GeocodeResponse = self
            .get_json(
                &url,
                &[("address", address.to_string()), ("key", self.api_key.clone())],
                "geocoding",
            )
            .await?;

        response.into_coordinate(address)
    }

    /// Driving directions between two points, summarised.
    pub async fn directions(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<RouteSummary, OracleError> {
        let url = format!("{}/directions/json", self.base_url);
        let response: DirectionsResponse = self
            .get_json(
                &url,
                &[
                    ("origin", from.to_lat_lng_param()),
                    ("destination", to.to_lat_lng_param()),
                    ("mode", "driving".to_string()),
                    ("key", self.api_key.clone()),
                ],
                "directions",
            )
            .await?;

        response.into_summary()
    }

    /// GET a JSON document, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        operation: &'static str,
    ) -> Result<T, OracleError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| OracleError::Unavailable("request limiter closed".to_string()))?;

        let mut attempt = 0;
        loop {
            match self.http.get(url).query(query).send().await {
                Ok(response) => {
                    let status = response.status();

                    if RETRY_STATUSES.contains(&status.as_u16()) && attempt < self.max_retries {
                        attempt += 1;
                        self.wait_before_retry(attempt, operation, &status.to_string())
                            .await;
                        continue;
                    }

                    if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(OracleError::Api {
                            status: status.as_u16(),
                            message: body,
                        });
                    }

                    let body = response.text().await?;
                    debug!(operation, bytes = body.len(), "provider response");

                    return serde_json::from_str(&body).map_err(|e| OracleError::Json {
                        message: e.to_string(),
                        body: Some(body.chars().take(500).collect()),
                    });
                }
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < self.max_retries => {
                    attempt += 1;
                    self.wait_before_retry(attempt, operation, &e.to_string())
                        .await;
                }
                Err(e) if e.is_timeout() => return Err(OracleError::Timeout { operation }),
                Err(e) => return Err(OracleError::Http(e)),
            }
        }
    }

    async fn wait_before_retry(&self, attempt: u32, operation: &'static str, reason: &str) {
        let delay = backoff_delay(self.backoff, attempt);
        warn!(
            operation,
            attempt,
            max_retries = self.max_retries,
            delay_ms = delay.as_millis() as u64,
            reason,
            "retrying provider request"
        );
        tokio::time::sleep(delay).await;
    }
}

/// Delay before the `attempt`-th retry (1-based): `base * 2^(attempt-1)`.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    base.saturating_mul(1u32 << exponent)
}

impl DistanceOracle for GoogleMapsClient {
    async fn geocode(&self, address: &str) -> Result<Coordinate, OracleError> {
        self.geocode_address(address.trim()).await
    }

    /// One Directions request answers both duration and distance.
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteSummary, OracleError> {
        self.directions(from, to).await
    }

    /// Not retried: this is a diagnostic and should report what it sees.
    async fn ping(&self) -> Result<u16, OracleError> {
        let response = self.http.get(&self.ping_url).send().await?;
        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = GoogleMapsConfig::new("test-key")
            .with_base_url("http://localhost:8080/")
            .with_timeouts(Duration::from_secs(1), Duration::from_secs(2))
            .with_retries(2, Duration::from_millis(10))
            .with_max_concurrent(10);

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.read_timeout, Duration::from_secs(2));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.backoff, Duration::from_millis(10));
        assert_eq!(config.max_concurrent, 10);
    }

    #[test]
    fn config_defaults() {
        let config = GoogleMapsConfig::new("test-key");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.ping_url, DEFAULT_PING_URL);
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.read_timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.backoff, Duration::from_millis(700));
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
    }

    #[test]
    fn client_creation() {
        let client = GoogleMapsClient::new(GoogleMapsConfig::new("test-key"));
        assert!(client.is_ok());
    }

    #[test]
    fn backoff_doubles() {
        let base = Duration::from_millis(700);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(700));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(1400));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(2800));
    }

    #[tokio::test]
    async fn unreachable_host_fails_without_retries() {
        // Port 9 (discard) on localhost is almost never listening.
        let config = GoogleMapsConfig::new("k")
            .with_base_url("http://127.0.0.1:9")
            .with_retries(0, Duration::ZERO)
            .with_timeouts(Duration::from_millis(200), Duration::from_millis(200));
        let client = GoogleMapsClient::new(config).unwrap();

        let result = client.geocode_address("anywhere").await;
        assert!(result.is_err());
        assert!(!result.unwrap_err().is_address_not_found());
    }
}
