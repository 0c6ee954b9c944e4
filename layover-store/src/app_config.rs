use layover_core::cache::CachePolicy;
use layover_core::pagination::DEFAULT_PAGE_SIZE;
use layover_core::provider::{WaitBounds, MAX_WAIT_MS, MIN_WAIT_MS};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub popularity: PopularityConfig,
    pub airports: AirportsConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// Upstream flight API (RapidAPI-hosted)
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_host: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_market")]
    pub market: String,
    #[serde(default = "default_min_wait")]
    pub min_wait_ms: u64,
    #[serde(default = "default_max_wait")]
    pub max_wait_ms: u64,
}

impl ProviderConfig {
    pub fn wait_bounds(&self) -> WaitBounds {
        WaitBounds {
            min_ms: self.min_wait_ms,
            max_ms: self.max_wait_ms,
        }
    }
}

fn default_currency() -> String { "USD".to_string() }
fn default_country_code() -> String { "US".to_string() }
fn default_market() -> String { "en-US".to_string() }
fn default_min_wait() -> u64 { MIN_WAIT_MS }
fn default_max_wait() -> u64 { MAX_WAIT_MS }

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_adults")]
    pub default_adults: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            default_adults: default_adults(),
        }
    }
}

fn default_page_size() -> usize { DEFAULT_PAGE_SIZE }
fn default_adults() -> u32 { 1 }

/// Response cache eviction. Leaving `ttl_seconds` unset keeps entries forever.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CacheConfig {
    pub ttl_seconds: Option<u64>,
}

impl CacheConfig {
    pub fn policy(&self) -> CachePolicy {
        match self.ttl_seconds {
            Some(secs) => CachePolicy::with_ttl(Duration::from_secs(secs)),
            None => CachePolicy::unbounded(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PopularityConfig {
    #[serde(default)]
    pub min_overlap_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AirportsConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    pub requests: i64,
    pub window_seconds: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests: 100,
            window_seconds: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `LAYOVER__PROVIDER__API_KEY=...`
            .add_source(config::Environment::with_prefix("LAYOVER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [server]
        port = 8000

        [database]
        url = "postgres://localhost/layover"

        [redis]
        url = "redis://127.0.0.1/"

        [provider]
        base_url = "https://flights.example.invalid/api/v1"
        api_key = "secret"
        api_host = "flights.example.invalid"

        [airports]
        path = "data/airports.json"
    "#;

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = parse(MINIMAL);
        assert_eq!(config.search.page_size, 5);
        assert_eq!(config.search.default_adults, 1);
        assert_eq!(config.provider.currency, "USD");
        assert_eq!(config.provider.wait_bounds(), WaitBounds::default());
        assert!(config.cache.policy().is_unbounded());
        assert_eq!(config.popularity.min_overlap_minutes, 0);
        assert_eq!(config.rate_limit.requests, 100);
    }

    #[test]
    fn test_cache_ttl_enables_eviction() {
        let config = parse(&format!("{}\n[cache]\nttl_seconds = 86400\n", MINIMAL));
        assert_eq!(config.cache.policy().ttl, Some(Duration::from_secs(86400)));
    }
}
