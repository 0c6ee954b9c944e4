//! Fakes shared by the pipeline tests.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use layover_core::models::{
    Airport, DetailStop, Flight, FlightApiResponse, FlightDetail, FlightDetailResponse, Leg, LegDetail,
    Segment, Stop,
};
use layover_core::provider::{DetailRequest, FlightProvider, ProviderError, SearchRequest};
use layover_core::repository::AirportDirectory;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub enum DetailBehavior {
    Succeed,
    Fail,
    Unsuccessful,
}

/// Scripted provider that counts its calls
pub struct MockProvider {
    search_response: Mutex<Result<FlightApiResponse, u16>>,
    details: HashMap<String, (u64, DetailBehavior)>,
    pub search_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub last_search: Mutex<Option<SearchRequest>>,
}

impl MockProvider {
    pub fn new(search_response: FlightApiResponse) -> Self {
        Self {
            search_response: Mutex::new(Ok(search_response)),
            details: HashMap::new(),
            search_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            last_search: Mutex::new(None),
        }
    }

    pub fn failing_search(status: u16) -> Self {
        let provider = Self::new(search_response(vec![]));
        *provider.search_response.lock().unwrap() = Err(status);
        provider
    }

    /// Delay (ms) and outcome for one itinerary's detail call. Itineraries
    /// without a script succeed immediately.
    pub fn with_detail(mut self, itinerary_id: &str, delay_ms: u64, behavior: DetailBehavior) -> Self {
        self.details.insert(itinerary_id.to_string(), (delay_ms, behavior));
        self
    }

    pub fn set_search_response(&self, response: FlightApiResponse) {
        *self.search_response.lock().unwrap() = Ok(response);
    }

    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_fetches(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FlightProvider for MockProvider {
    async fn search(&self, request: &SearchRequest) -> Result<FlightApiResponse, ProviderError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_search.lock().unwrap() = Some(request.clone());
        let scripted = self.search_response.lock().unwrap().clone();
        scripted.map_err(ProviderError::Status)
    }

    async fn flight_details(&self, request: &DetailRequest) -> Result<FlightDetailResponse, ProviderError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let (delay_ms, behavior) = self
            .details
            .get(&request.itinerary_id)
            .map(|(d, b)| (*d, b))
            .unwrap_or((0, &DetailBehavior::Succeed));

        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        match behavior {
            DetailBehavior::Succeed => Ok(detail_response(&request.itinerary_id)),
            DetailBehavior::Fail => Err(ProviderError::Status(503)),
            DetailBehavior::Unsuccessful => Ok(FlightDetailResponse {
                status: Some(false),
                message: Some(serde_json::json!("Rate limited")),
                timestamp: None,
                data: None,
            }),
        }
    }
}

pub struct TestAirports;

impl AirportDirectory for TestAirports {
    fn get_by_iata(&self, iata: &str) -> Option<Airport> {
        let (lat, long) = match iata {
            "LAX" => (33.9425, -118.4081),
            "JFK" => (40.6398, -73.7789),
            "DEN" => (39.8617, -104.6731),
            "ORD" => (41.9786, -87.9048),
            _ => return None,
        };
        Some(Airport {
            iata: iata.to_string(),
            name: format!("{} Airport", iata),
            city: iata.to_string(),
            state: None,
            country: "United States".to_string(),
            lat,
            long,
        })
    }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

pub fn at(hour: u32) -> NaiveDateTime {
    day(1).and_hms_opt(hour, 0, 0).unwrap()
}

/// Itinerary LAX→JFK via `via`, whose stop reports `ground_hours` of layover
pub fn itinerary(id: &str, via: &str, ground_hours: u32) -> Flight {
    let mut stop = Stop::at(via);
    stop.arrival = Some(at(9));
    stop.departure = Some(at(9 + ground_hours));
    Flight {
        id: Some(id.to_string()),
        price: None,
        legs: Some(vec![Leg {
            id: Some(id.to_string()),
            origin: Some(Stop::at("LAX")),
            destination: Some(Stop::at("JFK")),
            departure: at(6),
            arrival: at(12 + ground_hours),
            duration: None,
            carriers: None,
            stops: Some(vec![stop]),
            layover_hours: None,
        }]),
        layover_hours: None,
        extra: BTreeMap::new(),
    }
}

pub fn search_response(flights: Vec<Flight>) -> FlightApiResponse {
    FlightApiResponse {
        status: Some(true),
        message: Some(serde_json::json!("Successful")),
        timestamp: Some(1_714_000_000),
        data: Some(flights),
    }
}

fn place(code: &str) -> DetailStop {
    DetailStop {
        id: None,
        name: None,
        display_code: code.to_string(),
        city: None,
    }
}

fn segment(from: &str, to: &str, departure: NaiveDateTime, arrival: NaiveDateTime) -> Segment {
    Segment {
        id: format!("{}-{}", from, to),
        origin: place(from),
        destination: place(to),
        duration: None,
        day_change: None,
        flight_number: None,
        departure,
        arrival,
        marketing_carrier: None,
        operating_carrier: None,
    }
}

/// Detail for an itinerary connecting at DEN between 09:00 and 12:00. The
/// itinerary id is echoed back under `extra.itineraryId`.
pub fn detail_response(itinerary_id: &str) -> FlightDetailResponse {
    let mut extra = BTreeMap::new();
    extra.insert("itineraryId".to_string(), serde_json::json!(itinerary_id));

    FlightDetailResponse {
        status: Some(true),
        message: None,
        timestamp: None,
        data: Some(FlightDetail {
            legs: Some(vec![LegDetail {
                id: None,
                origin: Some(place("LAX")),
                destination: Some(place("JFK")),
                departure: at(6),
                arrival: at(16),
                segments: Some(vec![segment("LAX", "DEN", at(6), at(9)), segment("DEN", "JFK", at(12), at(16))]),
                layovers: None,
                duration: None,
                stop_count: Some(1),
            }]),
            pop_score: None,
            extra,
        }),
    }
}

pub fn itinerary_id_of(detail: &FlightDetailResponse) -> Option<&str> {
    detail.data.as_ref()?.extra.get("itineraryId")?.as_str()
}
