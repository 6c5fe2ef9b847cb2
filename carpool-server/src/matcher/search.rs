//! Greedy carpool matching with exhaustive rider search.
//!
//! Each round builds one car around the unassigned participant with the
//! longest solo trip. Riders are chosen by trying every subset of the
//! detour-compatible candidates, largest subsets first, keeping the
//! fastest feasible one. Rounds repeat until everyone is placed.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace, warn};

use crate::domain::{Coordinate, DomainError, Group, ParticipantId, TravelTime};
use crate::oracle::{DistanceOracle, OracleError};

use super::config::MatchConfig;
use super::error::PlanError;
use super::subsets::Combinations;

/// Where a participant starts and how long their solo trip takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Origin {
    pub coord: Coordinate,
    /// Travel time straight to the destination.
    pub direct: TravelTime,
}

/// Routing data for one matching run.
#[derive(Debug, Clone)]
pub struct MatchInput {
    pub destination: Coordinate,
    origins: BTreeMap<ParticipantId, Origin>,
}

impl MatchInput {
    pub fn new(destination: Coordinate) -> Self {
        Self {
            destination,
            origins: BTreeMap::new(),
        }
    }

    /// Add a participant. Returns false if the id was already present.
    pub fn insert(&mut self, id: ParticipantId, coord: Coordinate, direct: TravelTime) -> bool {
        self.origins
            .insert(id, Origin { coord, direct })
            .is_none()
    }

    pub fn origin(&self, id: ParticipantId) -> Result<Origin, DomainError> {
        self.origins
            .get(&id)
            .copied()
            .ok_or(DomainError::UnknownParticipant(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.origins.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

/// A rider provisionally compatible with the current driver.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    id: ParticipantId,
    coord: Coordinate,
}

/// Carpool matcher.
pub struct Matcher<'a, O: DistanceOracle> {
    oracle: &'a O,
    config: &'a MatchConfig,
}

impl<'a, O: DistanceOracle> Matcher<'a, O> {
    /// Create a new matcher.
    pub fn new(oracle: &'a O, config: &'a MatchConfig) -> Self {
        Self { oracle, config }
    }

    /// Partition every participant in `input` into groups.
    ///
    /// Groups are returned in the order they were formed. Each round places
    /// at least its driver, so there are at most `input.len()` rounds.
    pub async fn run(&self, input: &MatchInput) -> Result<Vec<Group>, PlanError> {
        let mut unassigned: BTreeSet<ParticipantId> = input.ids().collect();
        let mut groups = Vec::new();

        while let Some(driver) = select_driver(&unassigned, input) {
            let group = self.form_group(driver, &unassigned, input).await?;

            debug!(
                round = groups.len() + 1,
                driver = %group.driver,
                riders = ?group.riders,
                duration_secs = group.total_duration.as_secs(),
                "formed group"
            );

            for member in group.members() {
                unassigned.remove(&member);
            }
            groups.push(group);
        }

        Ok(groups)
    }

    /// Build the best group around `driver` from the unassigned set.
    async fn form_group(
        &self,
        driver: ParticipantId,
        unassigned: &BTreeSet<ParticipantId>,
        input: &MatchInput,
    ) -> Result<Group, PlanError> {
        let origin = input.origin(driver)?;
        let candidates = self.candidates(driver, origin, unassigned, input).await?;

        debug!(
            driver = %driver,
            direct_secs = origin.direct.as_secs(),
            candidates = candidates.len(),
            "selected driver"
        );

        let (riders, duration) = self
            .best_subset(origin, &candidates, input.destination)
            .await?;

        Ok(Group::new(driver, riders, duration))
    }

    /// Unassigned participants whose own detour fits the driver's ceiling.
    ///
    /// This is a pairwise test only; combinations are checked later.
    async fn candidates(
        &self,
        driver: ParticipantId,
        origin: Origin,
        unassigned: &BTreeSet<ParticipantId>,
        input: &MatchInput,
    ) -> Result<Vec<Candidate>, PlanError> {
        let mut candidates = Vec::new();

        for &id in unassigned.iter().filter(|&&id| id != driver) {
            let coord = input.origin(id)?.coord;

            let detour = match self.pairwise_detour(origin.coord, coord, input.destination).await {
                Ok(detour) => detour,
                Err(e) if !self.config.strict_mode => {
                    warn!(driver = %driver, candidate = %id, error = %e, "skipping candidate");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if detour.within_factor_of(origin.direct, self.config.detour_factor) {
                candidates.push(Candidate { id, coord });
            }
        }

        Ok(candidates)
    }

    /// Largest feasible rider subset, fastest first among equal sizes.
    ///
    /// Subsets of one size are tried in lexicographic candidate order and a
    /// later subset only wins with a strictly shorter duration.
    async fn best_subset(
        &self,
        origin: Origin,
        candidates: &[Candidate],
        destination: Coordinate,
    ) -> Result<(Vec<ParticipantId>, TravelTime), PlanError> {
        let limit = self.config.max_passengers.min(candidates.len());

        for k in (1..=limit).rev() {
            let mut best: Option<(Vec<ParticipantId>, TravelTime)> = None;

            for indices in Combinations::new(candidates.len(), k) {
                let stops: Vec<Coordinate> = indices.iter().map(|&i| candidates[i].coord).collect();

                let duration = match self.chained_duration(origin.coord, &stops, destination).await {
                    Ok(duration) => duration,
                    Err(e) if !self.config.strict_mode => {
                        warn!(subset = ?indices, error = %e, "skipping rider subset");
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };

                let feasible = duration.within_factor_of(origin.direct, self.config.detour_factor);
                trace!(k, subset = ?indices, duration_secs = duration.as_secs(), feasible, "evaluated subset");

                if feasible && best.as_ref().is_none_or(|(_, d)| duration < *d) {
                    let riders = indices.iter().map(|&i| candidates[i].id).collect();
                    best = Some((riders, duration));
                }
            }

            // Any feasible subset of this size beats every smaller one.
            if let Some(best) = best {
                return Ok(best);
            }
        }

        // Driving alone is the solo trip itself, which always fits.
        Ok((Vec::new(), origin.direct))
    }

    /// Driver → candidate → destination, used for the pairwise filter.
    async fn pairwise_detour(
        &self,
        driver: Coordinate,
        candidate: Coordinate,
        destination: Coordinate,
    ) -> Result<TravelTime, OracleError> {
        let pickup = self.oracle.travel_time(driver, candidate).await?;
        let onward = self.oracle.travel_time(candidate, destination).await?;
        Ok(pickup + onward)
    }

    /// Driver → each stop in order → destination.
    async fn chained_duration(
        &self,
        start: Coordinate,
        stops: &[Coordinate],
        destination: Coordinate,
    ) -> Result<TravelTime, OracleError> {
        let mut total = TravelTime::ZERO;
        let mut from = start;
        for &to in stops.iter().chain(std::iter::once(&destination)) {
            total = total + self.oracle.travel_time(from, to).await?;
            from = to;
        }
        Ok(total)
    }
}

/// The unassigned participant with the longest solo trip; lowest id on ties.
fn select_driver(unassigned: &BTreeSet<ParticipantId>, input: &MatchInput) -> Option<ParticipantId> {
    unassigned
        .iter()
        .filter_map(|&id| input.origins.get(&id).map(|o| (id, o.direct)))
        .min_by_key(|&(id, direct)| (Reverse(direct), id))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lng: f64) -> Coordinate {
        Coordinate::new(lng, 0.0).unwrap()
    }

    fn input(directs: &[u64]) -> MatchInput {
        let mut input = MatchInput::new(coord(10.0));
        for (i, &secs) in directs.iter().enumerate() {
            input.insert(ParticipantId(i), coord(i as f64), TravelTime::from_secs(secs));
        }
        input
    }

    #[test]
    fn driver_is_longest_solo_trip() {
        let input = input(&[300, 900, 600]);
        let all: BTreeSet<_> = input.ids().collect();
        assert_eq!(select_driver(&all, &input), Some(ParticipantId(1)));
    }

    #[test]
    fn driver_ties_go_to_lowest_id() {
        let input = input(&[500, 900, 900, 900]);
        let mut pool: BTreeSet<_> = input.ids().collect();
        assert_eq!(select_driver(&pool, &input), Some(ParticipantId(1)));

        pool.remove(&ParticipantId(1));
        assert_eq!(select_driver(&pool, &input), Some(ParticipantId(2)));
    }

    #[test]
    fn no_driver_when_everyone_assigned() {
        let input = input(&[100]);
        assert_eq!(select_driver(&BTreeSet::new(), &input), None);
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let mut input = MatchInput::new(coord(10.0));
        assert!(input.insert(ParticipantId(0), coord(0.0), TravelTime::from_secs(1)));
        assert!(!input.insert(ParticipantId(0), coord(1.0), TravelTime::from_secs(2)));
        assert_eq!(input.len(), 1);
    }

    #[test]
    fn unknown_origin_is_an_error() {
        let input = input(&[100]);
        assert_eq!(
            input.origin(ParticipantId(7)).unwrap_err(),
            DomainError::UnknownParticipant(ParticipantId(7))
        );
    }
}
