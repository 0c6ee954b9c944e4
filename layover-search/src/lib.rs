pub mod http_provider;
pub mod fanout;
pub mod service;

#[cfg(test)]
mod testing;

pub use http_provider::HttpFlightProvider;
pub use service::{FlightSearchService, SearchSettings};
