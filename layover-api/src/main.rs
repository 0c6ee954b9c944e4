use anyhow::Context;
use layover_api::{app, AppState};
use layover_core::popularity::PopularityAggregator;
use layover_core::repository::AirportDirectory;
use layover_search::{FlightSearchService, HttpFlightProvider, SearchSettings};
use layover_store::app_config::Config;
use layover_store::{AirportCatalog, DbClient, PostgresLayoverRepository, RedisClient};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "layover_api=debug,layover_search=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting layover search API on port {}", config.server.port);

    let cache_policy = config.cache.policy();
    if cache_policy.is_unbounded() {
        tracing::warn!("Response cache has no TTL; entries are kept until evicted externally");
    }

    // Redis: response cache and rate limiter
    let redis = Arc::new(
        RedisClient::new(&config.redis.url, cache_policy)
            .await
            .context("Failed to connect to Redis")?,
    );

    // Postgres: layover interest, read only
    let db = DbClient::new(&config.database.url)
        .await
        .context("Failed to connect to Postgres")?;
    let interests = Arc::new(PostgresLayoverRepository { pool: db.pool.clone() });

    let airports: Arc<dyn AirportDirectory> = Arc::new(
        AirportCatalog::load(&config.airports.path)
            .await
            .with_context(|| format!("Failed to load airports from {}", config.airports.path))?,
    );

    let provider = HttpFlightProvider::new(config.provider.clone())
        .context("Failed to build flight provider client")?;

    let popularity = Arc::new(PopularityAggregator::new(
        interests,
        config.popularity.min_overlap_minutes,
    ));

    let search = FlightSearchService::new(
        redis.clone(),
        Arc::new(provider),
        airports.clone(),
        popularity.clone(),
        SearchSettings::from_config(&config),
    );

    let app_state = AppState {
        search: Arc::new(search),
        popularity,
        airports,
        rate_limiter: Some(redis),
        rate_limit: config.rate_limit.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
