use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderValue},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use layover_core::models::FlightDetailResponse;
use layover_core::search::SearchQuery;
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const PARTIAL_FAILURES_HEADER: &str = "x-partial-failures";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/flights", get(get_flights))
}

#[derive(Debug, Deserialize)]
pub struct FlightsParams {
    pub origin: Option<String>,
    pub dest: Option<String>,
    pub date: Option<String>,
    pub return_date: Option<String>,
    pub num_adults: Option<String>,
    pub wait_time: Option<String>,
    pub page: Option<String>,
}

impl FlightsParams {
    pub fn into_query(self) -> Result<SearchQuery, AppError> {
        let origin = required("origin", self.origin)?.to_uppercase();
        let dest = required("dest", self.dest)?.to_uppercase();
        let date = parse_date("date", required("date", self.date)?)?;
        let return_date = parse_date("return_date", required("return_date", self.return_date)?)?;

        let mut query = SearchQuery::new(&origin, &dest, date, return_date);
        query.adults = parse_number("num_adults", self.num_adults)?;
        query.wait_time_ms = parse_number("wait_time", self.wait_time)?;
        query.page = parse_number("page", self.page)?.unwrap_or(1);
        Ok(query)
    }
}

fn required(name: &str, value: Option<String>) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::ValidationError(format!("Missing parameter: {}", name)))
}

fn parse_number<T: std::str::FromStr>(name: &str, value: Option<String>) -> Result<Option<T>, AppError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| AppError::ValidationError(format!("Invalid {}: expected a whole number", name))),
    }
}

fn parse_date(name: &str, value: String) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::ValidationError(format!("Invalid {}: expected YYYY-MM-DD", name)))
}

pub fn user_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

async fn ping() -> &'static str {
    "Pong!!!"
}

/// GET /api/flights
/// One page of itinerary details, best layover first
async fn get_flights(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<FlightsParams>,
) -> Result<(HeaderMap, Json<Vec<FlightDetailResponse>>), AppError> {
    let query = params.into_query()?;
    let outcome = state.search.search_flights(&query, user_id(&headers)).await?;

    info!(
        "Served page {} for {}-{}: {} flights",
        query.page,
        query.origin,
        query.destination,
        outcome.flights.len()
    );

    let mut response_headers = HeaderMap::new();
    response_headers.insert(PARTIAL_FAILURES_HEADER, HeaderValue::from(outcome.failures.len()));
    Ok((response_headers, Json(outcome.flights)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FlightsParams {
        FlightsParams {
            origin: Some("lax".into()),
            dest: Some("JFK".into()),
            date: Some("2024-05-01".into()),
            return_date: Some("2024-05-08".into()),
            num_adults: None,
            wait_time: Some("2000".into()),
            page: None,
        }
    }

    #[test]
    fn test_params_become_query() {
        let query = params().into_query().unwrap();
        assert_eq!(query.origin, "LAX");
        assert_eq!(query.page, 1);
        assert_eq!(query.wait_time_ms, Some(2000));
        assert_eq!(query.return_date, NaiveDate::from_ymd_opt(2024, 5, 8).unwrap());
    }

    #[test]
    fn test_missing_or_malformed_params_are_rejected() {
        let mut p = params();
        p.dest = None;
        assert!(matches!(p.into_query(), Err(AppError::ValidationError(_))));

        let mut p = params();
        p.date = Some("05/01/2024".into());
        assert!(matches!(p.into_query(), Err(AppError::ValidationError(_))));

        for bad in ["two", "-1", "1.5"] {
            let mut p = params();
            p.num_adults = Some(bad.into());
            assert!(matches!(p.into_query(), Err(AppError::ValidationError(_))));

            let mut p = params();
            p.page = Some(bad.into());
            assert!(matches!(p.into_query(), Err(AppError::ValidationError(_))));
        }
    }

    #[test]
    fn test_numeric_params_are_parsed() {
        let mut p = params();
        p.num_adults = Some("2".into());
        p.page = Some(" 3 ".into());
        let query = p.into_query().unwrap();
        assert_eq!(query.adults, Some(2));
        assert_eq!(query.page, 3);
    }

    #[test]
    fn test_blank_user_header_is_ignored() {
        let mut headers = HeaderMap::new();
        assert_eq!(user_id(&headers), None);
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("  "));
        assert_eq!(user_id(&headers), None);
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("u-1"));
        assert_eq!(user_id(&headers), Some("u-1"));
    }
}
