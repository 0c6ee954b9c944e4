use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::AppError;
use crate::search::user_id;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/layovers/{iata}/companions", get(get_companions))
}

#[derive(Debug, Serialize)]
pub struct CompanionsResponse {
    pub iata: String,
    pub companions: Vec<String>,
}

/// GET /api/layovers/{iata}/companions
/// Other users sharing a layover window with the caller at this airport
async fn get_companions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(iata): Path<String>,
) -> Result<Json<CompanionsResponse>, AppError> {
    let user = user_id(&headers)
        .ok_or_else(|| AppError::ValidationError("X-User-Id header is required".to_string()))?;
    let iata = iata.to_uppercase();
    if iata.len() != 3 {
        return Err(AppError::ValidationError("Invalid IATA code".to_string()));
    }
    if state.airports.get_by_iata(&iata).is_none() {
        return Err(AppError::NotFoundError("Airport not found".to_string()));
    }

    let companions = state
        .popularity
        .companions(user, &iata)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(CompanionsResponse { iata, companions }))
}
