use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{FlightApiResponse, FlightDetailResponse};
use crate::search::SearchQuery;
use crate::{CoreError, CoreResult};

pub const MIN_WAIT_MS: u64 = 500;
pub const MAX_WAIT_MS: u64 = 5000;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    Transport(String),
    #[error("Provider returned HTTP {0}")]
    Status(u16),
    #[error("Malformed provider payload: {0}")]
    Malformed(String),
    #[error("Provider reported an unsuccessful response")]
    Unsuccessful,
    #[error("Itinerary has no id")]
    MissingItineraryId,
}

/// Bounds applied to the provider's wait time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitBounds {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for WaitBounds {
    fn default() -> Self {
        Self {
            min_ms: MIN_WAIT_MS,
            max_ms: MAX_WAIT_MS,
        }
    }
}

impl WaitBounds {
    /// Clamp to `[min_ms, max_ms]`; no value means the floor
    pub fn clamp(&self, requested: Option<u64>) -> u64 {
        match requested {
            Some(ms) => ms.max(self.min_ms).min(self.max_ms),
            None => self.min_ms,
        }
    }
}

/// Parameters forwarded to the provider's search endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub return_date: NaiveDate,
    pub adults: u32,
    pub wait_time_ms: u64,
}

impl SearchRequest {
    pub fn new(query: &SearchQuery, default_adults: u32, bounds: &WaitBounds) -> CoreResult<Self> {
        // Callers validate first; this guards direct construction
        if query.date > query.return_date {
            return Err(CoreError::ValidationError("Invalid dates".to_string()));
        }

        Ok(Self {
            origin: query.origin.clone(),
            destination: query.destination.clone(),
            date: query.date,
            return_date: query.return_date,
            adults: query.adults.unwrap_or(default_adults),
            wait_time_ms: bounds.clamp(query.wait_time_ms),
        })
    }

    pub fn detail_request(&self, itinerary_id: &str) -> DetailRequest {
        DetailRequest {
            itinerary_id: itinerary_id.to_string(),
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            date: self.date,
            return_date: self.return_date,
            adults: self.adults,
        }
    }
}

/// One synthetic leg sent to the detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailLeg {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
}

/// Parameters forwarded to the provider's detail endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub itinerary_id: String,
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub return_date: NaiveDate,
    pub adults: u32,
}

impl DetailRequest {
    /// Outbound then inbound
    pub fn legs(&self) -> [DetailLeg; 2] {
        [
            DetailLeg {
                origin: self.origin.clone(),
                destination: self.destination.clone(),
                date: self.date,
            },
            DetailLeg {
                origin: self.destination.clone(),
                destination: self.origin.clone(),
                date: self.return_date,
            },
        ]
    }
}

/// Upstream flight-data provider
#[async_trait]
pub trait FlightProvider: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<FlightApiResponse, ProviderError>;

    async fn flight_details(&self, request: &DetailRequest) -> Result<FlightDetailResponse, ProviderError>;
}
