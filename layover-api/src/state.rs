use layover_core::popularity::PopularityAggregator;
use layover_core::repository::AirportDirectory;
use layover_search::FlightSearchService;
use layover_store::app_config::RateLimitConfig;
use layover_store::RedisClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<FlightSearchService>,
    pub popularity: Arc<PopularityAggregator>,
    pub airports: Arc<dyn AirportDirectory>,
    /// Per-IP limiter; `None` disables rate limiting
    pub rate_limiter: Option<Arc<RedisClient>>,
    pub rate_limit: RateLimitConfig,
}
