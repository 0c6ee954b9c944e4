pub mod models;
pub mod search;
pub mod cache;
pub mod provider;
pub mod repository;
pub mod filter;
pub mod scoring;
pub mod popularity;
pub mod pagination;

pub use provider::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("No results: {0}")]
    NotFoundError(String),
    #[error("Provider error: {0}")]
    ProviderError(#[from] ProviderError),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
