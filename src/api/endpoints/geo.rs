//! Address autocomplete and ZIP lookup endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::geo::{is_valid_zip, AddressSuggestion, AUTOCOMPLETE_DEBOUNCE_MS};

#[derive(Deserialize)]
pub struct AddressQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct AddressResponse {
    pub suggestions: Vec<AddressSuggestion>,
    /// Suggested client-side debounce before re-querying, in milliseconds.
    pub debounce_ms: u64,
}

pub async fn address(
    State(ctx): State<ApiContext>,
    Query(query): Query<AddressQuery>,
) -> Result<Json<AddressResponse>, ApiError> {
    let geo = ctx.geo.clone();
    let suggestions = tokio::task::spawn_blocking(move || geo.search_addresses(&query.q))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(Json(AddressResponse {
        suggestions,
        debounce_ms: AUTOCOMPLETE_DEBOUNCE_MS,
    }))
}

pub async fn zip(
    State(ctx): State<ApiContext>,
    Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !is_valid_zip(&code) {
        return Err(ApiError::BadRequest(
            "ZIP code must be exactly 5 digits".to_string(),
        ));
    }

    let geo = ctx.geo.clone();
    let place = tokio::task::spawn_blocking(move || geo.lookup_zip(&code))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    match place {
        Some(place) => Ok(Json(json!({ "city": place.city, "state": place.state }))),
        None => Err(ApiError::ZipNotFound),
    }
}
