//! Askama templates for the printable report.

use askama::Template;
use chrono::{DateTime, TimeZone};

use super::dto::{PlanResponse, ReportQuery};

/// Club name shown when the request does not give one.
const DEFAULT_CLUB_NAME: &str = "Sport Cov";

/// Team name shown when the request does not give one.
const DEFAULT_TEAM_NAME: &str = "My team";

/// Printable carpool report.
#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportTemplate {
    pub club_name: String,
    pub team_name: String,
    pub destination: Option<String>,
    pub logo_url: Option<String>,
    pub generated_at: String,
    pub cars: Vec<CarView>,
    pub co2_rows: Vec<Co2RowView>,
    pub co2_total: String,
    pub co2_per_km: f64,
    pub max_passengers: usize,
    pub detour_factor: f64,
}

/// One car on the report.
#[derive(Debug, Clone)]
pub struct CarView {
    pub car: String,
    pub driver: String,
    pub riders: Vec<String>,
    pub route_description: String,
    pub map_link: String,
}

/// One row of the CO2 table.
#[derive(Debug, Clone)]
pub struct Co2RowView {
    pub car: String,
    pub driver: String,
    pub rider_count: usize,
    pub co2_kg: String,
}

/// Two decimal places, as printed on the report.
fn kg(value: f64) -> String {
    format!("{value:.2}")
}

/// `Some` for non-blank text, trimmed.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ReportTemplate {
    /// Build the report for a plan.
    ///
    /// A logo from the query takes precedence over `default_logo`.
    pub fn new<Tz: TimeZone>(
        response: &PlanResponse,
        query: &ReportQuery,
        destination: Option<&str>,
        default_logo: &str,
        now: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let cars = response
            .groups
            .iter()
            .map(|g| CarView {
                car: g.car.clone(),
                driver: g.driver.name.clone(),
                riders: g.riders.iter().map(|r| r.name.clone()).collect(),
                route_description: g.route_description.clone(),
                map_link: g.map_link.clone(),
            })
            .collect();

        let co2_rows = response
            .co2_per_group
            .iter()
            .map(|c| Co2RowView {
                car: c.car.clone(),
                driver: c.driver.clone(),
                rider_count: c.rider_count,
                co2_kg: kg(c.co2_kg),
            })
            .collect();

        Self {
            club_name: non_blank(query.club_name.as_deref())
                .unwrap_or_else(|| DEFAULT_CLUB_NAME.to_string()),
            team_name: non_blank(query.team_name.as_deref())
                .unwrap_or_else(|| DEFAULT_TEAM_NAME.to_string()),
            destination: non_blank(destination),
            logo_url: non_blank(query.logo_url.as_deref()).or_else(|| non_blank(Some(default_logo))),
            generated_at: now.format("%d/%m/%Y %H:%M").to_string(),
            cars,
            co2_rows,
            co2_total: kg(response.co2_total_kg),
            co2_per_km: response.config.co2_per_km,
            max_passengers: response.config.max_passengers,
            detour_factor: response.config.detour_factor,
        }
    }
}
