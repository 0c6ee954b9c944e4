pub mod app_config;
pub mod redis_repo;
pub mod memory_cache;
pub mod database;
pub mod layover_repo;
pub mod airport_repo;

pub use redis_repo::RedisClient;
pub use memory_cache::InMemoryResponseCache;
pub use database::DbClient;
pub use layover_repo::{InMemoryLayoverRepository, PostgresLayoverRepository};
pub use airport_repo::AirportCatalog;
