use layover_core::cache::{self, ResponseCache, SearchKey};
use layover_core::filter::remove_invalid_flights;
use layover_core::models::{Flight, FlightApiResponse};
use layover_core::pagination::{paginate, DEFAULT_PAGE_SIZE};
use layover_core::popularity::PopularityAggregator;
use layover_core::provider::{FlightProvider, ProviderError, SearchRequest, WaitBounds};
use layover_core::repository::AirportDirectory;
use layover_core::scoring::{calculate_layover_scores, rank_by_layover};
use layover_core::search::{SearchOutcome, SearchQuery};
use layover_core::{CoreError, CoreResult};
use layover_store::app_config::Config;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::fanout::{DetailFanOut, FanOutResult};

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub page_size: usize,
    pub default_adults: u32,
    pub wait_bounds: WaitBounds,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_adults: 1,
            wait_bounds: WaitBounds::default(),
        }
    }
}

impl SearchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_size: config.search.page_size.max(1),
            default_adults: config.search.default_adults,
            wait_bounds: config.provider.wait_bounds(),
        }
    }
}

/// The search pipeline: cached search, filter, score, rank, paginate,
/// concurrent detail fetch, popularity.
pub struct FlightSearchService {
    cache: Arc<dyn ResponseCache>,
    provider: Arc<dyn FlightProvider>,
    airports: Arc<dyn AirportDirectory>,
    popularity: Arc<PopularityAggregator>,
    fan_out: DetailFanOut,
    settings: SearchSettings,
}

impl FlightSearchService {
    pub fn new(
        cache: Arc<dyn ResponseCache>,
        provider: Arc<dyn FlightProvider>,
        airports: Arc<dyn AirportDirectory>,
        popularity: Arc<PopularityAggregator>,
        settings: SearchSettings,
    ) -> Self {
        let fan_out = DetailFanOut::new(cache.clone(), provider.clone());
        Self {
            cache,
            provider,
            airports,
            popularity,
            fan_out,
            settings,
        }
    }

    /// Run one search. `requester` only excludes the caller's own layover
    /// interest from popularity counts.
    pub async fn search_flights(&self, query: &SearchQuery, requester: Option<&str>) -> CoreResult<SearchOutcome> {
        let span = info_span!(
            "search_flights",
            request_id = %Uuid::new_v4(),
            origin = %query.origin,
            dest = %query.destination,
            page = query.page,
        );
        self.run(query, requester).instrument(span).await
    }

    async fn run(&self, query: &SearchQuery, requester: Option<&str>) -> CoreResult<SearchOutcome> {
        query.validate(self.airports.as_ref())?;
        let request = SearchRequest::new(query, self.settings.default_adults, &self.settings.wait_bounds)?;

        let ranked = self.ranked_itineraries(&request).await?;
        let page = paginate(&ranked, query.page, self.settings.page_size);
        if page.is_empty() {
            info!("Page {} is past the last of {} itineraries", query.page, ranked.len());
            return Ok(SearchOutcome::default());
        }

        let FanOutResult { mut details, failures } = self.fan_out.fetch_page(&request, page).await;

        if let Err(e) = self.popularity.annotate(&mut details, requester).await {
            warn!("Popularity lookup failed, scores left at zero: {}", e);
        }

        info!("Returning {} flights ({} unavailable)", details.len(), failures.len());
        Ok(SearchOutcome { flights: details, failures })
    }

    /// Servable itineraries for a search, best layover first. Served from
    /// cache when this exact search was answered successfully before.
    pub async fn ranked_itineraries(&self, request: &SearchRequest) -> CoreResult<Vec<Flight>> {
        let key = SearchKey {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            date: request.date,
            return_date: request.return_date,
        }
        .cache_key();

        let response = match cache::lookup::<FlightApiResponse>(self.cache.as_ref(), &key).await {
            Some(cached) if cached.is_success() => cached,
            _ => {
                let fresh = self.fetch_search(request).await?;
                cache::store(self.cache.as_ref(), &key, &fresh, fresh.is_success()).await;
                fresh
            }
        };

        match response.data {
            Some(flights) if !flights.is_empty() => Ok(flights),
            _ => Err(CoreError::NotFoundError("No flights found".to_string())),
        }
    }

    /// Call the provider and prepare its answer for caching: invalid
    /// itineraries removed, scores attached, ranked.
    async fn fetch_search(&self, request: &SearchRequest) -> CoreResult<FlightApiResponse> {
        let mut response = self.provider.search(request).await.map_err(|e| {
            error!("Flight search failed: {}", e);
            e
        })?;

        if !response.is_success() {
            error!("Flight search returned status {:?}", response.status);
            return Err(ProviderError::Unsuccessful.into());
        }

        let flights = response
            .data
            .take()
            .ok_or_else(|| CoreError::NotFoundError("No flights found".to_string()))?;

        let mut flights = remove_invalid_flights(flights);
        calculate_layover_scores(&mut flights, self.airports.as_ref());
        rank_by_layover(&mut flights);

        response.data = Some(flights);
        Ok(response)
    }
}
