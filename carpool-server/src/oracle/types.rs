//! Google Maps API wire types.
//!
//! Only the fields the planner reads are modelled; everything else in the
//! responses is ignored by serde.

use serde::Deserialize;

use crate::domain::{Coordinate, TravelTime};

use super::error::OracleError;

/// Response of the Geocoding API (`/geocode/json`).
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: Option<String>,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Response of the Directions API (`/directions/json`).
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<Route>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteLeg {
    pub duration: ValueField,
    pub distance: ValueField,
}

/// A `{ "value": n, "text": "..." }` pair; `value` is seconds or metres.
#[derive(Debug, Clone, Deserialize)]
pub struct ValueField {
    pub value: u64,
    pub text: Option<String>,
}

/// Duration and length of the first route between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    pub duration: TravelTime,
    pub distance_km: f64,
}

impl GeocodeResponse {
    /// Extract the first result's location.
    ///
    /// `ZERO_RESULTS` (or `OK` with an empty list) means the address does
    /// not exist; any other status is a provider failure.
    pub fn into_coordinate(self, address: &str) -> Result<Coordinate, OracleError> {
        match self.status.as_str() {
            "OK" => {
                let result = self.results.into_iter().next().ok_or_else(|| {
                    OracleError::AddressNotFound {
                        address: address.to_string(),
                    }
                })?;
                let loc = result.geometry.location;
                Coordinate::new(loc.lng, loc.lat).map_err(|e| OracleError::Json {
                    message: e.to_string(),
                    body: None,
                })
            }
            "ZERO_RESULTS" => Err(OracleError::AddressNotFound {
                address: address.to_string(),
            }),
            _ => Err(OracleError::Status {
                operation: "geocode",
                status: status_with_message(self.status, self.error_message),
            }),
        }
    }
}

impl DirectionsResponse {
    /// Summarise the first leg of the first route.
    pub fn into_summary(self) -> Result<RouteSummary, OracleError> {
        if self.status != "OK" {
            return Err(OracleError::Status {
                operation: "directions",
                status: status_with_message(self.status, self.error_message),
            });
        }

        let leg = self
            .routes
            .into_iter()
            .next()
            .and_then(|r| r.legs.into_iter().next())
            .ok_or_else(|| OracleError::Json {
                message: "directions response has no route legs".to_string(),
                body: None,
            })?;

        Ok(RouteSummary {
            duration: TravelTime::from_secs(leg.duration.value),
            distance_km: leg.distance.value as f64 / 1000.0,
        })
    }
}

fn status_with_message(status: String, message: Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!("{status} ({m})"),
        _ => status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_geocode_ok() {
        let json = r#"{
            "status": "OK",
            "results": [{
                "formatted_address": "Place du Capitole, Toulouse",
                "geometry": { "location": { "lat": 43.6045, "lng": 1.4440 }, "location_type": "ROOFTOP" },
                "place_id": "abc"
            }]
        }"#;
        let resp: GeocodeResponse = serde_json::from_str(json).unwrap();
        let coord = resp.into_coordinate("Capitole").unwrap();
        assert_eq!(coord.lng(), 1.4440);
        assert_eq!(coord.lat(), 43.6045);
    }

    #[test]
    fn geocode_zero_results_is_not_found() {
        let json = r#"{ "status": "ZERO_RESULTS", "results": [] }"#;
        let resp: GeocodeResponse = serde_json::from_str(json).unwrap();
        let err = resp.into_coordinate("nowhere").unwrap_err();
        assert!(err.is_address_not_found());
    }

    #[test]
    fn geocode_denied_is_status_error() {
        let json = r#"{ "status": "REQUEST_DENIED", "results": [], "error_message": "bad key" }"#;
        let resp: GeocodeResponse = serde_json::from_str(json).unwrap();
        let err = resp.into_coordinate("x").unwrap_err();
        assert_eq!(err.to_string(), "geocode error: REQUEST_DENIED (bad key)");
    }

    #[test]
    fn parse_directions_ok() {
        let json = r#"{
            "status": "OK",
            "routes": [{
                "summary": "A62",
                "legs": [{
                    "duration": { "value": 600, "text": "10 mins" },
                    "distance": { "value": 5000, "text": "5.0 km" }
                }]
            }]
        }"#;
        let resp: DirectionsResponse = serde_json::from_str(json).unwrap();
        let summary = resp.into_summary().unwrap();
        assert_eq!(summary.duration, TravelTime::from_secs(600));
        assert_eq!(summary.distance_km, 5.0);
    }

    #[test]
    fn directions_without_routes_fails() {
        let json = r#"{ "status": "OK", "routes": [] }"#;
        let resp: DirectionsResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(resp.into_summary(), Err(OracleError::Json { .. })));
    }

    #[test]
    fn directions_not_found_status() {
        let json = r#"{ "status": "NOT_FOUND" }"#;
        let resp: DirectionsResponse = serde_json::from_str(json).unwrap();
        let err = resp.into_summary().unwrap_err();
        assert_eq!(err.to_string(), "directions error: NOT_FOUND");
    }
}
