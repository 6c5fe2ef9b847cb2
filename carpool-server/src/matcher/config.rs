//! Matching configuration.

/// Configuration parameters for carpool matching.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Maximum number of riders per car (driver not included).
    pub max_passengers: usize,

    /// Maximum ratio of a driver's group trip to their solo trip.
    /// Must be greater than 1.
    pub detour_factor: f64,

    /// CO2 emitted per car-kilometre, in kg.
    pub co2_per_km: f64,

    /// Abort on any routing failure inside a matching round.
    ///
    /// When false, a candidate whose lookups fail is skipped and a rider
    /// subset whose chained duration cannot be computed is treated as
    /// infeasible. Geocoding and direct durations always abort.
    pub strict_mode: bool,
}

/// Error returned when a configuration value is out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid match configuration: {0}")]
pub struct InvalidConfig(pub &'static str);

impl MatchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_passengers: usize, detour_factor: f64, co2_per_km: f64, strict_mode: bool) -> Self {
        Self {
            max_passengers,
            detour_factor,
            co2_per_km,
            strict_mode,
        }
    }

    /// Check that the values make sense together.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if !self.detour_factor.is_finite() || self.detour_factor <= 1.0 {
            return Err(InvalidConfig("detour factor must be a number greater than 1"));
        }
        if !self.co2_per_km.is_finite() || self.co2_per_km < 0.0 {
            return Err(InvalidConfig("CO2 per km must be a non-negative number"));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_passengers: 3,
            detour_factor: 1.5,
            co2_per_km: 0.2,
            strict_mode: true,
        }
    }
}
