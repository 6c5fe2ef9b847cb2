//! Application settings from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::matcher::MatchConfig;
use crate::oracle::GoogleMapsConfig;

/// Error loading settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    /// A required variable is unset or blank
    #[error("{0} is not set")]
    ConfigurationMissing(&'static str),

    /// A variable is set to something that cannot be parsed
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Everything the server reads from its environment.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub google_api_key: String,
    pub co2_per_km: f64,
    pub max_passengers: usize,
    pub detour_factor: f64,
    pub strict_mode: bool,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub max_retries: u32,
    pub backoff: Duration,
    /// Logo shown on reports when the request does not supply one.
    pub logo_url: String,
    pub bind_addr: SocketAddr,
}

impl AppSettings {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its
    /// value. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let google_api_key =
            get("GOOGLE_API_KEY").ok_or(SettingsError::ConfigurationMissing("GOOGLE_API_KEY"))?;

        let detour_factor = match get("DETOUR_FACTOR") {
            Some(value) => parse("DETOUR_FACTOR", value)?,
            None => parse_or(get("SEUIL_RALLONGE"), "SEUIL_RALLONGE", 1.5)?,
        };

        let strict_mode = match get("STRICT_MODE") {
            Some(value) => parse_bool("STRICT_MODE", value)?,
            None => true,
        };

        Ok(Self {
            google_api_key,
            co2_per_km: parse_or(get("CO2_PER_KM"), "CO2_PER_KM", 0.2)?,
            max_passengers: parse_or(get("MAX_PASSENGERS"), "MAX_PASSENGERS", 3)?,
            detour_factor,
            strict_mode,
            connect_timeout: parse_secs(get("CONNECT_TIMEOUT"), "CONNECT_TIMEOUT", Duration::from_secs(5))?,
            read_timeout: parse_secs(get("READ_TIMEOUT"), "READ_TIMEOUT", Duration::from_secs(30))?,
            max_retries: parse_or(get("REQUESTS_TOTAL_RETRIES"), "REQUESTS_TOTAL_RETRIES", 5)?,
            backoff: parse_secs(get("REQUESTS_BACKOFF"), "REQUESTS_BACKOFF", Duration::from_millis(700))?,
            logo_url: get("LOGO_URL").unwrap_or_default(),
            bind_addr: match get("BIND_ADDR") {
                Some(value) => parse("BIND_ADDR", value)?,
                None => SocketAddr::from(([127, 0, 0, 1], 3000)),
            },
        })
    }

    /// Matching parameters.
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig::new(
            self.max_passengers,
            self.detour_factor,
            self.co2_per_km,
            self.strict_mode,
        )
    }

    /// Google Maps client configuration.
    pub fn maps_config(&self) -> GoogleMapsConfig {
        GoogleMapsConfig::new(&self.google_api_key)
            .with_timeouts(self.connect_timeout, self.read_timeout)
            .with_retries(self.max_retries, self.backoff)
    }
}

fn parse<T: FromStr>(name: &'static str, value: String) -> Result<T, SettingsError> {
    value
        .parse()
        .map_err(|_| SettingsError::Invalid { name, value })
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, SettingsError> {
    value.map_or(Ok(default), |v| parse(name, v))
}

/// Seconds as a decimal number, e.g. `"0.7"`.
fn parse_secs(
    value: Option<String>,
    name: &'static str,
    default: Duration,
) -> Result<Duration, SettingsError> {
    let Some(value) = value else {
        return Ok(default);
    };
    let secs: f64 = parse(name, value.clone())?;
    Duration::try_from_secs_f64(secs).map_err(|_| SettingsError::Invalid { name, value })
}

fn parse_bool(name: &'static str, value: String) -> Result<bool, SettingsError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SettingsError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppSettings, SettingsError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppSettings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let settings = load(&[("GOOGLE_API_KEY", "key")]).unwrap();

        assert_eq!(settings.google_api_key, "key");
        assert_eq!(settings.match_config(), MatchConfig::default());
        assert_eq!(settings.connect_timeout, Duration::from_secs(5));
        assert_eq!(settings.read_timeout, Duration::from_secs(30));
        assert_eq!(settings.max_retries, 5);
        assert_eq!(settings.backoff, Duration::from_millis(700));
        assert_eq!(settings.logo_url, "");
        assert_eq!(settings.bind_addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn api_key_required() {
        assert_eq!(
            load(&[]).unwrap_err(),
            SettingsError::ConfigurationMissing("GOOGLE_API_KEY")
        );
        assert_eq!(
            load(&[("GOOGLE_API_KEY", "   ")]).unwrap_err(),
            SettingsError::ConfigurationMissing("GOOGLE_API_KEY")
        );
    }

    #[test]
    fn overrides() {
        let settings = load(&[
            ("GOOGLE_API_KEY", "key"),
            ("CO2_PER_KM", "0.12"),
            ("MAX_PASSENGERS", "4"),
            ("DETOUR_FACTOR", "2"),
            ("STRICT_MODE", "false"),
            ("READ_TIMEOUT", "10.5"),
            ("REQUESTS_TOTAL_RETRIES", "0"),
            ("LOGO_URL", " https://example.org/logo.png "),
            ("BIND_ADDR", "0.0.0.0:8080"),
        ])
        .unwrap();

        assert_eq!(settings.match_config(), MatchConfig::new(4, 2.0, 0.12, false));
        assert_eq!(settings.read_timeout, Duration::from_millis(10_500));
        assert_eq!(settings.max_retries, 0);
        assert_eq!(settings.logo_url, "https://example.org/logo.png");
        assert_eq!(settings.bind_addr.port(), 8080);
    }

    #[test]
    fn legacy_detour_name() {
        let settings = load(&[("GOOGLE_API_KEY", "key"), ("SEUIL_RALLONGE", "1.8")]).unwrap();
        assert_eq!(settings.detour_factor, 1.8);

        let settings = load(&[
            ("GOOGLE_API_KEY", "key"),
            ("SEUIL_RALLONGE", "1.8"),
            ("DETOUR_FACTOR", "1.2"),
        ])
        .unwrap();
        assert_eq!(settings.detour_factor, 1.2);
    }

    #[test]
    fn invalid_values_named() {
        let err = load(&[("GOOGLE_API_KEY", "key"), ("MAX_PASSENGERS", "three")]).unwrap_err();
        assert_eq!(
            err,
            SettingsError::Invalid {
                name: "MAX_PASSENGERS",
                value: "three".to_string()
            }
        );

        let err = load(&[("GOOGLE_API_KEY", "key"), ("CONNECT_TIMEOUT", "-1")]).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { name: "CONNECT_TIMEOUT", .. }));

        let err = load(&[("GOOGLE_API_KEY", "key"), ("STRICT_MODE", "maybe")]).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for STRICT_MODE: \"maybe\"");
    }

    #[test]
    fn maps_config_carries_network_settings() {
        let settings = load(&[
            ("GOOGLE_API_KEY", "key"),
            ("CONNECT_TIMEOUT", "1"),
            ("REQUESTS_BACKOFF", "0.25"),
        ])
        .unwrap();
        let config = settings.maps_config();

        assert_eq!(config.api_key, "key");
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.backoff, Duration::from_millis(250));
    }
}
