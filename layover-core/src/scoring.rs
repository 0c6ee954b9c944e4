use crate::models::{Flight, Leg, Stop};
use crate::repository::AirportDirectory;
use std::cmp::Ordering;

/// Constant cruise speed used to estimate airborne time. Scores are only
/// compared against each other, so the exact figure matters little.
pub const PLANE_SPEED_KMH: f64 = 900.0;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two (lat, long) points in kilometres
pub fn great_circle_km(p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let (lat1, lon1) = p1;
    let (lat2, lon2) = p2;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Layover hours for one leg.
///
/// Stops that report their own arrival and departure give an exact figure.
/// Otherwise the leg's total duration is compared with the time needed to fly
/// origin → stops → destination in a straight line.
pub fn leg_layover_hours(leg: &Leg, airports: &dyn AirportDirectory) -> f64 {
    let stops = leg.stops.as_deref().unwrap_or_default();

    if let Some(hours) = reported_ground_hours(stops) {
        return hours;
    }

    let mut route: Vec<&Stop> = Vec::with_capacity(stops.len() + 2);
    route.extend(leg.origin.as_ref());
    route.extend(stops.iter());
    route.extend(leg.destination.as_ref());

    let flight_km: f64 = route
        .windows(2)
        .filter_map(|hop| {
            let from = airports.get_by_iata(hop[0].display_code.as_deref()?)?;
            let to = airports.get_by_iata(hop[1].display_code.as_deref()?)?;
            Some(great_circle_km((from.lat, from.long), (to.lat, to.long)))
        })
        .sum();

    let total_hours = (leg.arrival - leg.departure).num_seconds() as f64 / 3600.0;
    total_hours - flight_km / PLANE_SPEED_KMH
}

fn reported_ground_hours(stops: &[Stop]) -> Option<f64> {
    if stops.is_empty() {
        return None;
    }

    stops
        .iter()
        .map(|stop| {
            let (arrival, departure) = (stop.arrival?, stop.departure?);
            Some(((departure - arrival).num_seconds() as f64 / 3600.0).max(0.0))
        })
        .sum()
}

/// Attach layover scores to every leg and itinerary. An itinerary's score is
/// the sum over its legs.
pub fn calculate_layover_scores(flights: &mut [Flight], airports: &dyn AirportDirectory) {
    for flight in flights.iter_mut() {
        let mut total = 0.0;
        if let Some(legs) = flight.legs.as_mut() {
            for leg in legs.iter_mut() {
                let hours = leg_layover_hours(leg, airports);
                leg.layover_hours = Some(hours);
                total += hours;
            }
        }
        flight.layover_hours = Some(total);
    }
}

/// Order by layover score, highest first. The sort is stable, so equal
/// scores keep their upstream order and page boundaries stay deterministic.
pub fn rank_by_layover(flights: &mut [Flight]) {
    flights.sort_by(|a, b| {
        let score_a = a.layover_hours.unwrap_or(f64::NEG_INFINITY);
        let score_b = b.layover_hours.unwrap_or(f64::NEG_INFINITY);
        score_b.partial_cmp(&score_a).unwrap_or(Ordering::Equal)
    });
}
