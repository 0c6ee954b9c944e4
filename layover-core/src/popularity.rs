use chrono::{Duration, NaiveDateTime};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::models::{FlightDetail, FlightDetailResponse, LayoverInterest};
use crate::repository::LayoverInterestRepository;

/// Minimum shared time for a companion match
pub const COMPANION_MIN_OVERLAP_MINUTES: i64 = 30;

/// Time spent at a connecting airport. Missing bounds mean the window is
/// open on that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoverWindow {
    pub iata: String,
    pub arrive: Option<NaiveDateTime>,
    pub depart: Option<NaiveDateTime>,
}

impl LayoverWindow {
    /// Shared time with an interest row, if any
    fn overlap_with(&self, interest: &LayoverInterest) -> Option<Duration> {
        let start = self.arrive.map_or(interest.arrive, |a| a.max(interest.arrive));
        let end = self.depart.map_or(interest.depart, |d| d.min(interest.depart));
        (end > start).then(|| end - start)
    }
}

/// Connecting windows of an itinerary.
///
/// Consecutive segments within a leg bound each window. A leg that lists
/// layovers without segments contributes open windows at those airports.
pub fn layover_windows(detail: &FlightDetail) -> Vec<LayoverWindow> {
    let mut windows = Vec::new();

    for leg in detail.legs.iter().flatten() {
        match leg.segments.as_deref() {
            Some(segments) if !segments.is_empty() => {
                for pair in segments.windows(2) {
                    windows.push(LayoverWindow {
                        iata: pair[0].destination.display_code.clone(),
                        arrive: Some(pair[0].arrival),
                        depart: Some(pair[1].departure),
                    });
                }
            }
            _ => {
                for layover in leg.layovers.iter().flatten() {
                    windows.push(LayoverWindow {
                        iata: layover.destination.display_code.clone(),
                        arrive: None,
                        depart: None,
                    });
                }
            }
        }
    }

    windows
}

/// Read-only aggregation of other users' layover interest
pub struct PopularityAggregator {
    interests: Arc<dyn LayoverInterestRepository>,
    min_overlap: Duration,
}

impl PopularityAggregator {
    pub fn new(interests: Arc<dyn LayoverInterestRepository>, min_overlap_minutes: i64) -> Self {
        Self {
            interests,
            min_overlap: Duration::minutes(min_overlap_minutes.max(0)),
        }
    }

    /// Set `pop_score` on every detail: for each layover window, the number of
    /// distinct users (other than `requester`) whose interest at that airport
    /// overlaps it, summed over the itinerary's windows.
    ///
    /// Scores are reset to zero before the lookup, so a repository failure
    /// leaves every detail at zero.
    pub async fn annotate(
        &self,
        flights: &mut [FlightDetailResponse],
        requester: Option<&str>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut per_flight = Vec::with_capacity(flights.len());
        let mut airports = BTreeSet::new();

        for flight in flights.iter_mut() {
            let windows = match flight.data.as_mut() {
                Some(detail) => {
                    detail.pop_score = Some(0);
                    layover_windows(detail)
                }
                None => Vec::new(),
            };
            airports.extend(windows.iter().map(|w| w.iata.clone()));
            per_flight.push(windows);
        }

        if airports.is_empty() {
            return Ok(());
        }

        let airports: Vec<String> = airports.into_iter().collect();
        let interests = self.interests.interests_at(&airports).await?;

        for (flight, windows) in flights.iter_mut().zip(per_flight) {
            if let Some(detail) = flight.data.as_mut() {
                let score: usize = windows
                    .iter()
                    .map(|w| self.count_overlapping(w, &interests, requester))
                    .sum();
                detail.pop_score = Some(score as i64);
            }
        }

        Ok(())
    }

    pub fn count_overlapping(
        &self,
        window: &LayoverWindow,
        interests: &[LayoverInterest],
        requester: Option<&str>,
    ) -> usize {
        interests
            .iter()
            .filter(|i| i.iata_code == window.iata)
            .filter(|i| requester != Some(i.user_id.as_str()))
            .filter(|i| {
                window
                    .overlap_with(i)
                    .is_some_and(|shared| shared >= self.min_overlap)
            })
            .map(|i| i.user_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Users whose interest at `iata` shares at least
    /// [`COMPANION_MIN_OVERLAP_MINUTES`] with any of `user_id`'s own windows
    /// there. Empty when the user has declared nothing at that airport.
    pub async fn companions(
        &self,
        user_id: &str,
        iata: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = self.interests.interests_at(&[iata.to_string()]).await?;
        let min_shared = Duration::minutes(COMPANION_MIN_OVERLAP_MINUTES);

        let own: Vec<LayoverWindow> = rows
            .iter()
            .filter(|r| r.user_id == user_id && r.iata_code == iata)
            .map(|r| LayoverWindow {
                iata: r.iata_code.clone(),
                arrive: Some(r.arrive),
                depart: Some(r.depart),
            })
            .collect();

        let mut seen = HashSet::new();
        let mut matching = Vec::new();
        for row in rows.iter().filter(|r| r.user_id != user_id && r.iata_code == iata) {
            let shares_time = own
                .iter()
                .any(|w| w.overlap_with(row).is_some_and(|shared| shared >= min_shared));
            if shares_time && seen.insert(row.user_id.as_str()) {
                matching.push(row.user_id.clone());
            }
        }

        Ok(matching)
    }
}
