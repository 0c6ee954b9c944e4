use crate::models::Flight;

/// Whether an itinerary can be served as a layover option: it needs legs,
/// and every leg needs at least one intermediate stop.
pub fn is_servable(flight: &Flight) -> bool {
    match &flight.legs {
        None => false,
        Some(legs) => legs
            .iter()
            .all(|leg| leg.stops.as_ref().is_some_and(|stops| !stops.is_empty())),
    }
}

/// Drop itineraries that cannot be served, keeping input order
pub fn remove_invalid_flights(flights: Vec<Flight>) -> Vec<Flight> {
    flights.into_iter().filter(is_servable).collect()
}
