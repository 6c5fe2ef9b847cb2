//! End-to-end planning: geocode, route, match, estimate.

use futures::future::try_join_all;
use tracing::info;

use crate::domain::{DomainError, Group, Participant, ParticipantId};
use crate::oracle::DistanceOracle;

use super::co2::{Co2Estimate, estimate_co2};
use super::config::MatchConfig;
use super::error::PlanError;
use super::search::{MatchInput, Matcher};

/// Outcome of planning one request.
#[derive(Debug, Clone)]
pub struct CarpoolPlan {
    /// Participants in request order; `participants[i].id == ParticipantId(i)`.
    pub participants: Vec<Participant>,
    /// Destination address as given (trimmed).
    pub destination: String,
    /// Groups in formation order.
    pub groups: Vec<Group>,
    pub co2: Co2Estimate,
    /// Configuration the plan was computed with.
    pub config: MatchConfig,
}

impl CarpoolPlan {
    /// Look up a participant by id.
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }
}

/// Plan carpools for `participants` travelling to `destination`.
///
/// Every address is geocoded and every participant's direct duration is
/// looked up before matching starts; any failure there aborts the request.
pub async fn plan_carpools<O: DistanceOracle>(
    oracle: &O,
    participants: Vec<Participant>,
    destination: &str,
    config: &MatchConfig,
) -> Result<CarpoolPlan, PlanError> {
    config.validate()?;

    if participants.is_empty() {
        return Err(PlanError::InvalidRequest(
            "at least one participant is required".to_string(),
        ));
    }
    let destination = destination.trim();
    if destination.is_empty() {
        return Err(DomainError::BlankField("destination").into());
    }

    let coords = try_join_all(participants.iter().map(|p| oracle.geocode(&p.address))).await?;
    let dest_coord = oracle.geocode(destination).await?;

    let directs = try_join_all(coords.iter().map(|&c| oracle.travel_time(c, dest_coord))).await?;

    let mut input = MatchInput::new(dest_coord);
    for ((participant, coord), direct) in participants.iter().zip(coords).zip(directs) {
        if !input.insert(participant.id, coord, direct) {
            return Err(PlanError::InvalidRequest(format!(
                "duplicate participant id {}",
                participant.id
            )));
        }
    }

    let groups = Matcher::new(oracle, config).run(&input).await?;
    let co2 = estimate_co2(oracle, &groups, &input, config.co2_per_km).await?;

    info!(
        participants = participants.len(),
        groups = groups.len(),
        co2_total_kg = co2.total_kg,
        "planned carpools"
    );

    Ok(CarpoolPlan {
        participants,
        destination: destination.to_string(),
        groups,
        co2,
        config: config.clone(),
    })
}
