use layover_core::models::Airport;
use layover_core::repository::AirportDirectory;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum AirportLoadError {
    #[error("Failed to read airport file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse airport file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Row shape of the public airports.json dataset (coordinates as strings)
#[derive(Debug, Deserialize)]
struct AirportRecord {
    code: String,
    name: String,
    city: String,
    state: Option<String>,
    country: String,
    lat: String,
    lon: String,
}

/// IATA-keyed airport lookup held in memory
#[derive(Debug, Default)]
pub struct AirportCatalog {
    by_iata: HashMap<String, Airport>,
}

impl AirportCatalog {
    pub fn from_airports(airports: Vec<Airport>) -> Self {
        Self {
            by_iata: airports.into_iter().map(|a| (a.iata.clone(), a)).collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, AirportLoadError> {
        let records: Vec<AirportRecord> = serde_json::from_str(json)?;
        let mut airports = Vec::with_capacity(records.len());

        for record in records {
            let (Ok(lat), Ok(long)) = (record.lat.trim().parse::<f64>(), record.lon.trim().parse::<f64>()) else {
                warn!("Skipping airport {} with unparseable coordinates", record.code);
                continue;
            };
            airports.push(Airport {
                iata: record.code,
                name: record.name,
                city: record.city,
                state: record.state,
                country: record.country,
                lat,
                long,
            });
        }

        Ok(Self::from_airports(airports))
    }

    pub async fn load(path: &str) -> Result<Self, AirportLoadError> {
        let json = tokio::fs::read_to_string(path).await?;
        let catalog = Self::from_json_str(&json)?;
        info!("Loaded {} airports from {}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.by_iata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_iata.is_empty()
    }
}

impl AirportDirectory for AirportCatalog {
    fn get_by_iata(&self, iata: &str) -> Option<Airport> {
        self.by_iata.get(iata).cloned()
    }
}
