use futures_util::future::join_all;
use layover_core::cache::{self, DetailKey, ResponseCache};
use layover_core::models::{Flight, FlightDetailResponse};
use layover_core::provider::{FlightProvider, ProviderError, SearchRequest};
use layover_core::search::DetailFailure;
use std::sync::Arc;
use tracing::{debug, warn};

/// Details for one page, in page order, plus the items that failed
#[derive(Debug, Default)]
pub struct FanOutResult {
    pub details: Vec<FlightDetailResponse>,
    pub failures: Vec<DetailFailure>,
}

/// Fetches itinerary details concurrently, cache first
pub struct DetailFanOut {
    cache: Arc<dyn ResponseCache>,
    provider: Arc<dyn FlightProvider>,
}

impl DetailFanOut {
    pub fn new(cache: Arc<dyn ResponseCache>, provider: Arc<dyn FlightProvider>) -> Self {
        Self { cache, provider }
    }

    /// Fetch every itinerary of `page` at once and wait for all of them.
    ///
    /// Output follows page order regardless of completion order. A failed item
    /// is dropped from `details` and reported in `failures`; it never affects
    /// the other items.
    pub async fn fetch_page(&self, request: &SearchRequest, page: &[Flight]) -> FanOutResult {
        let fetches = page
            .iter()
            .enumerate()
            .map(|(index, flight)| self.fetch_item(request, index, flight));

        let mut result = FanOutResult::default();
        for outcome in join_all(fetches).await {
            match outcome {
                Ok(detail) => result.details.push(detail),
                Err(failure) => {
                    warn!(
                        "Detail unavailable for item {} ({:?}): {}",
                        failure.index, failure.itinerary_id, failure.reason
                    );
                    result.failures.push(failure);
                }
            }
        }

        debug!(
            "Fan-out finished: {} details, {} failures",
            result.details.len(),
            result.failures.len()
        );
        result
    }

    async fn fetch_item(
        &self,
        request: &SearchRequest,
        index: usize,
        flight: &Flight,
    ) -> Result<FlightDetailResponse, DetailFailure> {
        let failure = |e: ProviderError| DetailFailure {
            index,
            itinerary_id: flight.id.clone(),
            reason: e.to_string(),
        };

        let itinerary_id = flight
            .id
            .as_deref()
            .ok_or_else(|| failure(ProviderError::MissingItineraryId))?;

        self.fetch_detail(request, itinerary_id).await.map_err(failure)
    }

    /// Detail for one itinerary: cached copy if present, otherwise the
    /// provider's answer, stored only when it succeeded.
    pub async fn fetch_detail(
        &self,
        request: &SearchRequest,
        itinerary_id: &str,
    ) -> Result<FlightDetailResponse, ProviderError> {
        let key = DetailKey {
            itinerary_id: itinerary_id.to_string(),
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            date: request.date,
            return_date: request.return_date,
        }
        .cache_key();

        if let Some(cached) = cache::lookup::<FlightDetailResponse>(self.cache.as_ref(), &key).await {
            if cached.is_success() {
                return Ok(cached);
            }
        }

        let detail = self
            .provider
            .flight_details(&request.detail_request(itinerary_id))
            .await?;

        if !detail.is_success() {
            return Err(ProviderError::Unsuccessful);
        }

        cache::store(self.cache.as_ref(), &key, &detail, true).await;
        Ok(detail)
    }
}
