//! CO2 savings estimate.
//!
//! Only riders count: the driver would have driven anyway, while each
//! rider avoids a round trip in their own car.

use crate::domain::Group;
use crate::oracle::DistanceOracle;

use super::error::PlanError;
use super::search::MatchInput;

/// CO2 saved by one car.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCo2 {
    pub rider_count: usize,
    /// Rounded to 2 decimal places.
    pub co2_kg: f64,
}

/// CO2 saved per car and in total.
#[derive(Debug, Clone, PartialEq)]
pub struct Co2Estimate {
    /// One entry per group, in group order.
    pub per_group: Vec<GroupCo2>,
    /// Sum of the rounded per-group figures, rounded again.
    pub total_kg: f64,
}

/// Round to 2 decimal places.
pub fn round_kg(kg: f64) -> f64 {
    (kg * 100.0).round() / 100.0
}

/// Estimate the CO2 avoided by each group's riders.
///
/// Each rider saves `2 × distance(rider → destination) × co2_per_km`.
pub async fn estimate_co2<O: DistanceOracle>(
    oracle: &O,
    groups: &[Group],
    input: &MatchInput,
    co2_per_km: f64,
) -> Result<Co2Estimate, PlanError> {
    let mut per_group = Vec::with_capacity(groups.len());

    for group in groups {
        let mut kg = 0.0;
        for &rider in &group.riders {
            let origin = input.origin(rider)?;
            let one_way_km = oracle.travel_distance(origin.coord, input.destination).await?;
            kg += one_way_km * 2.0 * co2_per_km;
        }
        per_group.push(GroupCo2 {
            rider_count: group.rider_count(),
            co2_kg: round_kg(kg),
        });
    }

    let total_kg = round_kg(per_group.iter().map(|g| g.co2_kg).sum());

    Ok(Co2Estimate {
        per_group,
        total_kg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, ParticipantId, TravelTime};
    use crate::oracle::TableOracle;

    fn coord(lng: f64) -> Coordinate {
        Coordinate::new(lng, 47.0).unwrap()
    }

    fn setup() -> (TableOracle, MatchInput) {
        let oracle = TableOracle::new()
            .with_place("P0", coord(0.0))
            .with_place("P1", coord(0.1))
            .with_place("P2", coord(0.2))
            .with_place("DEST", coord(1.0))
            .with_distance("P0", "DEST", 30.0)
            .with_distance("P1", "DEST", 5.0)
            .with_distance("P2", "DEST", 12.345);

        let mut input = MatchInput::new(coord(1.0));
        for i in 0..3 {
            input.insert(ParticipantId(i), coord(i as f64 / 10.0), TravelTime::from_secs(600));
        }
        (oracle, input)
    }

    #[test]
    fn rounding() {
        assert_eq!(round_kg(1.234), 1.23);
        assert_eq!(round_kg(1.235_1), 1.24);
        assert_eq!(round_kg(0.0), 0.0);
    }

    #[tokio::test]
    async fn only_riders_count() {
        let (oracle, input) = setup();
        let groups = vec![Group::new(
            ParticipantId(0),
            vec![ParticipantId(1)],
            TravelTime::from_secs(700),
        )];

        let estimate = estimate_co2(&oracle, &groups, &input, 0.2).await.unwrap();

        // 5 km each way, 0.2 kg/km: 2.0 kg. The driver's 30 km is ignored.
        assert_eq!(estimate.per_group, vec![GroupCo2 { rider_count: 1, co2_kg: 2.0 }]);
        assert_eq!(estimate.total_kg, 2.0);
        assert_eq!(oracle.distance_calls(), 1);
    }

    #[tokio::test]
    async fn solo_groups_save_nothing() {
        let (oracle, input) = setup();
        let groups = vec![
            Group::solo(ParticipantId(0), TravelTime::from_secs(600)),
            Group::solo(ParticipantId(1), TravelTime::from_secs(600)),
        ];

        let estimate = estimate_co2(&oracle, &groups, &input, 0.2).await.unwrap();

        assert_eq!(estimate.per_group.len(), 2);
        assert!(estimate.per_group.iter().all(|g| g.co2_kg == 0.0 && g.rider_count == 0));
        assert_eq!(estimate.total_kg, 0.0);
        assert_eq!(oracle.distance_calls(), 0);
    }

    #[tokio::test]
    async fn total_sums_rounded_groups() {
        let (oracle, input) = setup();
        let groups = vec![
            Group::new(ParticipantId(0), vec![ParticipantId(1), ParticipantId(2)], TravelTime::from_secs(900)),
        ];

        let estimate = estimate_co2(&oracle, &groups, &input, 0.2).await.unwrap();

        // (5 + 12.345) * 2 * 0.2 = 6.938 -> 6.94
        assert_eq!(estimate.per_group[0].co2_kg, 6.94);
        assert_eq!(estimate.per_group[0].rider_count, 2);
        assert_eq!(estimate.total_kg, 6.94);
    }

    #[tokio::test]
    async fn missing_distance_aborts() {
        let (_, input) = setup();
        let oracle = TableOracle::new();
        let groups = vec![Group::new(ParticipantId(0), vec![ParticipantId(1)], TravelTime::from_secs(1))];

        let result = estimate_co2(&oracle, &groups, &input, 0.2).await;
        assert!(matches!(result, Err(PlanError::Oracle(_))));
    }
}
