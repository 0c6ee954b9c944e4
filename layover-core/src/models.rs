use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// Airport directory
// ============================================================================

/// Airport record as served by the airport directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Airport {
    pub iata: String,
    pub name: String,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub lat: f64,
    pub long: f64,
}

// ============================================================================
// Search payload (itinerary summaries)
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Carrier {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "altid")]
    pub alt_id: Option<String>,
    #[serde(rename = "displaycode")]
    pub display_code: Option<String>,
    #[serde(rename = "displaycodetype")]
    pub display_code_type: Option<String>,
    pub alliance: Option<i64>,
}

/// A place on a leg: origin, destination or an intermediate stop
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stop {
    pub id: Option<i64>,
    pub entity_id: Option<i64>,
    pub alt_id: Option<String>,
    pub parent_id: Option<i64>,
    pub parent_entity_id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub display_code: Option<String>,
    /// Ground time at an intermediate stop, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<NaiveDateTime>,
}

impl Stop {
    pub fn at(code: &str) -> Self {
        Self {
            display_code: Some(code.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    pub id: Option<String>,
    pub origin: Option<Stop>,
    pub destination: Option<Stop>,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub duration: Option<i64>,
    pub carriers: Option<Vec<Carrier>>,
    pub stops: Option<Vec<Stop>>,
    pub layover_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Price {
    pub amount: Option<f64>,
    #[serde(rename = "updatestatus")]
    pub update_status: Option<String>,
    #[serde(rename = "lastupdated")]
    pub last_updated: Option<NaiveDateTime>,
    #[serde(rename = "quoteage")]
    pub quote_age: Option<i64>,
    pub score: Option<f64>,
    #[serde(rename = "transfertype")]
    pub transfer_type: Option<String>,
}

/// One itinerary summary from a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: Option<String>,
    pub price: Option<Price>,
    pub legs: Option<Vec<Leg>>,
    pub layover_hours: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightApiResponse {
    pub status: Option<bool>,
    pub message: Option<Value>,
    pub timestamp: Option<i64>,
    pub data: Option<Vec<Flight>>,
}

impl FlightApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == Some(true)
    }
}

// ============================================================================
// Detail payload (one itinerary expanded)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailStop {
    pub id: Option<String>,
    pub name: Option<String>,
    pub display_code: String,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layover {
    pub segment_id: String,
    pub origin: DetailStop,
    pub destination: DetailStop,
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierDetail {
    pub id: Value,
    pub name: Option<String>,
    pub display_code: Option<String>,
    pub display_code_type: Option<String>,
    pub brand_color: Option<String>,
    pub logo: Option<String>,
    pub alt_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub origin: DetailStop,
    pub destination: DetailStop,
    pub duration: Option<i64>,
    pub day_change: Option<i64>,
    pub flight_number: Option<String>,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub marketing_carrier: Option<CarrierDetail>,
    pub operating_carrier: Option<CarrierDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegDetail {
    pub id: Option<String>,
    pub origin: Option<DetailStop>,
    pub destination: Option<DetailStop>,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub segments: Option<Vec<Segment>>,
    pub layovers: Option<Vec<Layover>>,
    pub duration: Option<i64>,
    pub stop_count: Option<i64>,
}

/// Full expansion of an itinerary. Fare, baggage and any other provider
/// fields are carried through untouched in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightDetail {
    pub legs: Option<Vec<LegDetail>>,
    pub pop_score: Option<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightDetailResponse {
    pub status: Option<bool>,
    pub message: Option<Value>,
    pub timestamp: Option<i64>,
    pub data: Option<FlightDetail>,
}

impl FlightDetailResponse {
    pub fn is_success(&self) -> bool {
        self.status == Some(true) && self.data.is_some()
    }
}

// ============================================================================
// Layover interest (owned by the layover collaborator)
// ============================================================================

/// A user's declared interest in spending a layover window at an airport
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoverInterest {
    pub user_id: String,
    pub iata_code: String,
    pub arrive: NaiveDateTime,
    pub depart: NaiveDateTime,
}
