//! Route descriptions and map links for a car.

use reqwest::Url;

use crate::domain::{DomainError, Group, Participant};

/// Google Maps directions endpoint used for shareable links.
const MAPS_DIR_URL: &str = "https://www.google.com/maps/dir/";

/// Separator between stops in a route description.
const STOP_SEPARATOR: &str = " → ";

/// The stops of one car, in driving order, ending at the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    stops: Vec<String>,
}

impl Itinerary {
    /// Build from addresses already in driving order.
    pub fn new(stops: Vec<String>) -> Self {
        Self { stops }
    }

    /// Driver's address, each rider's address, then the destination.
    pub fn for_group(
        group: &Group,
        participants: &[Participant],
        destination: &str,
    ) -> Result<Self, DomainError> {
        let mut stops = Vec::with_capacity(group.rider_count() + 2);
        for id in group.members() {
            let participant = participants
                .iter()
                .find(|p| p.id == id)
                .ok_or(DomainError::UnknownParticipant(id))?;
            stops.push(participant.address.clone());
        }
        stops.push(destination.to_string());
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[String] {
        &self.stops
    }

    /// Stops joined with arrows, e.g. `"1 Rue A → 2 Rue B → Stade"`.
    pub fn description(&self) -> String {
        self.stops.join(STOP_SEPARATOR)
    }

    /// A Google Maps directions link through every stop.
    ///
    /// Intermediate stops become `|`-separated waypoints; the parameter is
    /// left out when there are none. Returns `None` for fewer than two
    /// stops.
    pub fn map_link(&self) -> Option<String> {
        let [origin, waypoints @ .., destination] = self.stops.as_slice() else {
            return None;
        };

        let mut params = vec![
            ("api", "1".to_string()),
            ("origin", origin.clone()),
            ("destination", destination.clone()),
        ];
        if !waypoints.is_empty() {
            params.push(("waypoints", waypoints.join("|")));
        }

        Url::parse_with_params(MAPS_DIR_URL, &params)
            .ok()
            .map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParticipantId, TravelTime};

    fn query(link: &str) -> Vec<(String, String)> {
        Url::parse(link)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn stops(names: &[&str]) -> Itinerary {
        Itinerary::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn description_joins_with_arrows() {
        let itinerary = stops(&["1 Rue A", "2 Rue B", "Stade"]);
        assert_eq!(itinerary.description(), "1 Rue A → 2 Rue B → Stade");
    }

    #[test]
    fn solo_link_has_no_waypoints() {
        let link = stops(&["1 Rue A", "Stade Municipal"]).map_link().unwrap();

        assert!(link.starts_with("https://www.google.com/maps/dir/?"));
        assert_eq!(
            query(&link),
            vec![
                ("api".to_string(), "1".to_string()),
                ("origin".to_string(), "1 Rue A".to_string()),
                ("destination".to_string(), "Stade Municipal".to_string()),
            ]
        );
    }

    #[test]
    fn riders_become_waypoints() {
        let link = stops(&["A", "B & co", "C", "Stade"]).map_link().unwrap();
        let pairs = query(&link);

        assert!(pairs.contains(&("origin".to_string(), "A".to_string())));
        assert!(pairs.contains(&("destination".to_string(), "Stade".to_string())));
        assert!(pairs.contains(&("waypoints".to_string(), "B & co|C".to_string())));
    }

    #[test]
    fn too_few_stops_have_no_link() {
        assert_eq!(stops(&["Stade"]).map_link(), None);
        assert_eq!(stops(&[]).map_link(), None);
    }

    #[test]
    fn group_stops_follow_members() {
        let participants = vec![
            Participant::new(ParticipantId(0), "Ana", "A", "", "").unwrap(),
            Participant::new(ParticipantId(1), "Ben", "B", "", "").unwrap(),
            Participant::new(ParticipantId(2), "Cy", "C", "", "").unwrap(),
        ];
        let group = Group::new(
            ParticipantId(2),
            vec![ParticipantId(0)],
            TravelTime::from_secs(60),
        );

        let itinerary = Itinerary::for_group(&group, &participants, "Stade").unwrap();
        assert_eq!(itinerary.stops(), ["C", "A", "Stade"]);

        let missing = Group::solo(ParticipantId(9), TravelTime::ZERO);
        assert_eq!(
            Itinerary::for_group(&missing, &participants, "Stade").unwrap_err(),
            DomainError::UnknownParticipant(ParticipantId(9))
        );
    }
}
