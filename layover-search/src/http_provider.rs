use async_trait::async_trait;
use layover_core::models::{FlightApiResponse, FlightDetailResponse};
use layover_core::provider::{DetailRequest, FlightProvider, ProviderError, SearchRequest};
use layover_store::app_config::ProviderConfig;
use serde::de::DeserializeOwned;
use tracing::debug;

const SEARCH_PATH: &str = "/searchFlights";
const DETAIL_PATH: &str = "/getFlightDetails";

/// Client for the RapidAPI-hosted flight search API
pub struct HttpFlightProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl HttpFlightProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn search_params(&self, request: &SearchRequest) -> Vec<(&'static str, String)> {
        vec![
            ("origin", request.origin.clone()),
            ("destination", request.destination.clone()),
            ("date", request.date.to_string()),
            ("returnDate", request.return_date.to_string()),
            ("waitTime", request.wait_time_ms.to_string()),
            ("adults", request.adults.to_string()),
            ("currency", self.config.currency.clone()),
            ("countryCode", self.config.country_code.clone()),
            ("market", self.config.market.clone()),
        ]
    }

    pub fn detail_params(&self, request: &DetailRequest) -> Result<Vec<(&'static str, String)>, ProviderError> {
        let legs = serde_json::to_string(&request.legs())
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(vec![
            ("itineraryId", request.itinerary_id.clone()),
            ("legs", legs),
            ("adults", request.adults.to_string()),
            ("currency", self.config.currency.clone()),
            ("countryCode", self.config.country_code.clone()),
            ("market", self.config.market.clone()),
        ])
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-RapidAPI-Key", &self.config.api_key)
            .header("X-RapidAPI-Host", &self.config.api_host)
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl FlightProvider for HttpFlightProvider {
    async fn search(&self, request: &SearchRequest) -> Result<FlightApiResponse, ProviderError> {
        let params = self.search_params(request);
        self.get_json(SEARCH_PATH, &params).await
    }

    async fn flight_details(&self, request: &DetailRequest) -> Result<FlightDetailResponse, ProviderError> {
        let params = self.detail_params(request)?;
        self.get_json(DETAIL_PATH, &params).await
    }
}
