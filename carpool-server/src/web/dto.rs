//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Participant, ParticipantId};
use crate::itinerary::Itinerary;
use crate::matcher::CarpoolPlan;

/// Request to plan carpools.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    /// People travelling, in the order they were entered
    pub participants: Vec<ParticipantInput>,

    /// Shared destination address
    pub destination: String,
}

/// A participant as submitted.
#[derive(Debug, Deserialize)]
pub struct ParticipantInput {
    pub name: String,

    /// Starting address
    pub address: String,

    #[serde(default)]
    pub email: String,

    #[serde(default, alias = "telephone")]
    pub phone: String,
}

impl PlanRequest {
    /// Validate into domain participants and the destination.
    ///
    /// Ids follow the submission order.
    pub fn into_parts(self) -> Result<(Vec<Participant>, String), DomainError> {
        let participants = self
            .participants
            .into_iter()
            .enumerate()
            .map(|(i, p)| Participant::new(ParticipantId(i), p.name, p.address, p.email, p.phone))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((participants, self.destination))
    }
}

/// Response for a plan.
///
/// Also accepted back by the report endpoint, so it round-trips through
/// serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Cars in the order they were formed
    pub groups: Vec<GroupResult>,

    /// Total CO2 saved, in kg
    pub co2_total_kg: f64,

    /// CO2 saved per car
    pub co2_per_group: Vec<GroupCo2Result>,

    /// Parameters the plan was computed with
    pub config: ConfigResult,
}

/// One car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupResult {
    /// Display label, e.g. "Car 1"
    pub car: String,

    pub driver: ContactResult,

    /// Riders in pickup order
    #[serde(default)]
    pub riders: Vec<ContactResult>,

    /// Stops joined with arrows, destination last
    pub route_description: String,

    /// Google Maps directions link (empty if unavailable)
    #[serde(default)]
    pub map_link: String,

    /// Chained driving time, in seconds
    #[serde(default)]
    pub total_duration_secs: u64,
}

/// Name and contact details of a driver or rider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactResult {
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,
}

/// CO2 saved by one car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCo2Result {
    pub car: String,

    /// Driver name
    pub driver: String,

    #[serde(default)]
    pub driver_email: String,

    pub rider_count: usize,

    pub co2_kg: f64,
}

/// Matching parameters echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigResult {
    pub max_passengers: usize,
    pub detour_factor: f64,
    pub co2_per_km: f64,
}

/// Response for the routing diagnostics endpoint.
#[derive(Debug, Serialize)]
pub struct DiagResponse {
    pub ok: bool,
    pub status_code: u16,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query parameters for report rendering.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub club_name: Option<String>,
    pub team_name: Option<String>,
    pub logo_url: Option<String>,

    /// Only used when rendering from a previous result
    pub destination: Option<String>,
}

fn car_label(index: usize) -> String {
    format!("Car {}", index + 1)
}

impl ContactResult {
    fn from_participant(p: &Participant) -> Self {
        Self {
            name: p.name.clone(),
            email: p.email.clone(),
            phone: p.phone.clone(),
        }
    }
}

impl PlanResponse {
    /// Create from a computed plan.
    pub fn from_plan(plan: &CarpoolPlan) -> Result<Self, DomainError> {
        let contact = |id: ParticipantId| {
            plan.participant(id)
                .map(ContactResult::from_participant)
                .ok_or(DomainError::UnknownParticipant(id))
        };

        let mut groups = Vec::with_capacity(plan.groups.len());
        let mut co2_per_group = Vec::with_capacity(plan.groups.len());

        for (i, (group, co2)) in plan.groups.iter().zip(&plan.co2.per_group).enumerate() {
            let driver = contact(group.driver)?;
            let riders = group
                .riders
                .iter()
                .map(|&id| contact(id))
                .collect::<Result<Vec<_>, _>>()?;
            let itinerary = Itinerary::for_group(group, &plan.participants, &plan.destination)?;

            co2_per_group.push(GroupCo2Result {
                car: car_label(i),
                driver: driver.name.clone(),
                driver_email: driver.email.clone(),
                rider_count: co2.rider_count,
                co2_kg: co2.co2_kg,
            });
            groups.push(GroupResult {
                car: car_label(i),
                driver,
                riders,
                route_description: itinerary.description(),
                map_link: itinerary.map_link().unwrap_or_default(),
                total_duration_secs: group.total_duration.as_secs(),
            });
        }

        Ok(Self {
            groups,
            co2_total_kg: plan.co2.total_kg,
            co2_per_group,
            config: ConfigResult {
                max_passengers: plan.config.max_passengers,
                detour_factor: plan.config.detour_factor,
                co2_per_km: plan.config.co2_per_km,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Group, TravelTime};
    use crate::matcher::{Co2Estimate, GroupCo2, MatchConfig};

    fn plan() -> CarpoolPlan {
        let participants = vec![
            Participant::new(ParticipantId(0), "Ana", "1 Rue A", "ana@example.org", "0600").unwrap(),
            Participant::new(ParticipantId(1), "Ben", "2 Rue B", "", "").unwrap(),
            Participant::new(ParticipantId(2), "Cy", "3 Rue C", "", "").unwrap(),
        ];
        CarpoolPlan {
            participants,
            destination: "Stade".to_string(),
            groups: vec![
                Group::new(ParticipantId(0), vec![ParticipantId(2)], TravelTime::from_secs(900)),
                Group::solo(ParticipantId(1), TravelTime::from_secs(300)),
            ],
            co2: Co2Estimate {
                per_group: vec![
                    GroupCo2 { rider_count: 1, co2_kg: 2.4 },
                    GroupCo2 { rider_count: 0, co2_kg: 0.0 },
                ],
                total_kg: 2.4,
            },
            config: MatchConfig::default(),
        }
    }

    #[test]
    fn request_assigns_ids_in_order() {
        let request: PlanRequest = serde_json::from_str(
            r#"{"participants":[
                {"name":"Sam","address":" 1 Rue A "},
                {"name":"Sam","address":"2 Rue B","telephone":"0601"}
            ],"destination":"Stade"}"#,
        )
        .unwrap();

        let (participants, destination) = request.into_parts().unwrap();
        assert_eq!(destination, "Stade");
        assert_eq!(participants[0].id, ParticipantId(0));
        assert_eq!(participants[0].address, "1 Rue A");
        assert_eq!(participants[1].id, ParticipantId(1));
        assert_eq!(participants[1].phone, "0601");
        assert_eq!(participants[1].email, "");
    }

    #[test]
    fn request_rejects_blank_address() {
        let request: PlanRequest = serde_json::from_str(
            r#"{"participants":[{"name":"Sam","address":"  "}],"destination":"Stade"}"#,
        )
        .unwrap();
        assert_eq!(request.into_parts().unwrap_err(), DomainError::BlankField("address"));
    }

    #[test]
    fn response_from_plan() {
        let response = PlanResponse::from_plan(&plan()).unwrap();

        assert_eq!(response.groups.len(), 2);
        let first = &response.groups[0];
        assert_eq!(first.car, "Car 1");
        assert_eq!(first.driver.name, "Ana");
        assert_eq!(first.riders.len(), 1);
        assert_eq!(first.riders[0].name, "Cy");
        assert_eq!(first.route_description, "1 Rue A → 3 Rue C → Stade");
        assert!(first.map_link.contains("waypoints=3+Rue+C"));
        assert_eq!(first.total_duration_secs, 900);

        assert_eq!(response.groups[1].car, "Car 2");
        assert!(response.groups[1].riders.is_empty());
        assert!(!response.groups[1].map_link.contains("waypoints"));

        assert_eq!(response.co2_per_group[0].driver_email, "ana@example.org");
        assert_eq!(response.co2_per_group[0].rider_count, 1);
        assert_eq!(response.co2_total_kg, 2.4);
        assert_eq!(response.config.max_passengers, 3);
    }

    #[test]
    fn response_json_shape() {
        let json = serde_json::to_value(PlanResponse::from_plan(&plan()).unwrap()).unwrap();

        assert_eq!(json["groups"][0]["driver"]["phone"], "0600");
        assert_eq!(json["co2_per_group"][1]["co2_kg"], 0.0);
        assert_eq!(json["config"]["detour_factor"], 1.5);

        let back: PlanResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back.groups[0].car, "Car 1");
    }

    #[test]
    fn unknown_participant_in_plan() {
        let mut plan = plan();
        plan.groups[1].driver = ParticipantId(7);
        assert_eq!(
            PlanResponse::from_plan(&plan).unwrap_err(),
            DomainError::UnknownParticipant(ParticipantId(7))
        );
    }
}
