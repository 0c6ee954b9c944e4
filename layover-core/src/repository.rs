use async_trait::async_trait;

use crate::models::{Airport, LayoverInterest};

/// Airport lookup used for IATA validation and stop coordinates
pub trait AirportDirectory: Send + Sync {
    fn get_by_iata(&self, iata: &str) -> Option<Airport>;
}

/// Read access to users' declared layover interest
#[async_trait]
pub trait LayoverInterestRepository: Send + Sync {
    /// All interest rows at any of the given airports
    async fn interests_at(
        &self,
        airports: &[String],
    ) -> Result<Vec<LayoverInterest>, Box<dyn std::error::Error + Send + Sync>>;
}
