use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::FlightDetailResponse;
use crate::repository::AirportDirectory;
use crate::{CoreError, CoreResult};

/// Caller-facing flight search parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub return_date: NaiveDate,
    pub adults: Option<u32>,
    pub wait_time_ms: Option<u64>,
    pub page: u32,
}

impl SearchQuery {
    pub fn new(origin: &str, destination: &str, date: NaiveDate, return_date: NaiveDate) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            date,
            return_date,
            adults: None,
            wait_time_ms: None,
            page: 1,
        }
    }

    /// Reject anything that must never reach the cache or the provider
    pub fn validate(&self, airports: &dyn AirportDirectory) -> CoreResult<()> {
        if self.origin.len() != 3 || self.destination.len() != 3 {
            return Err(CoreError::ValidationError("Invalid IATA code".to_string()));
        }
        if airports.get_by_iata(&self.origin).is_none() {
            return Err(CoreError::ValidationError("Invalid origin airport".to_string()));
        }
        if airports.get_by_iata(&self.destination).is_none() {
            return Err(CoreError::ValidationError("Invalid destination airport".to_string()));
        }
        if self.date > self.return_date {
            return Err(CoreError::ValidationError("Invalid dates".to_string()));
        }
        if self.page == 0 {
            return Err(CoreError::ValidationError("Page numbers start at 1".to_string()));
        }
        if self.adults == Some(0) {
            return Err(CoreError::ValidationError("At least one adult is required".to_string()));
        }
        Ok(())
    }
}

/// A page item whose detail could not be fetched
#[derive(Debug, Clone, Serialize)]
pub struct DetailFailure {
    /// Position within the requested page
    pub index: usize,
    pub itinerary_id: Option<String>,
    pub reason: String,
}

/// Result of one search: the annotated details in ranking order plus the
/// page items that were dropped along the way
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub flights: Vec<FlightDetailResponse>,
    pub failures: Vec<DetailFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Airport;

    struct TwoAirports;

    impl AirportDirectory for TwoAirports {
        fn get_by_iata(&self, iata: &str) -> Option<Airport> {
            ["LAX", "JFK"].contains(&iata).then(|| Airport {
                iata: iata.to_string(),
                name: iata.to_string(),
                city: iata.to_string(),
                state: None,
                country: "United States".to_string(),
                lat: 0.0,
                long: 0.0,
            })
        }
    }

    fn query() -> SearchQuery {
        SearchQuery::new(
            "LAX",
            "JFK",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
        )
    }

    #[test]
    fn test_valid_query_passes() {
        assert!(query().validate(&TwoAirports).is_ok());
    }

    #[test]
    fn test_unknown_airport_rejected() {
        let mut q = query();
        q.destination = "ZZZ".to_string();
        let err = q.validate(&TwoAirports).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(msg) if msg.contains("destination")));
    }

    #[test]
    fn test_malformed_iata_rejected() {
        let mut q = query();
        q.origin = "LAXX".to_string();
        assert!(matches!(q.validate(&TwoAirports), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn test_return_before_outbound_rejected() {
        let mut q = query();
        q.return_date = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        assert!(matches!(q.validate(&TwoAirports), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn test_same_day_return_allowed() {
        let mut q = query();
        q.return_date = q.date;
        assert!(q.validate(&TwoAirports).is_ok());
    }

    #[test]
    fn test_page_zero_rejected() {
        let mut q = query();
        q.page = 0;
        assert!(q.validate(&TwoAirports).is_err());
    }
}
