//! Form submission endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::forms::{submit_booking, submit_contact, submit_provider_signup};
use crate::models::{BookingRequest, ContactMessage, ProviderSignup};

pub async fn booking(
    State(ctx): State<ApiContext>,
    Json(form): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let persistence = ctx.persistence.clone();
    let id = tokio::task::spawn_blocking(move || submit_booking(persistence.as_ref(), &form))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok((StatusCode::CREATED, Json(json!({ "id": id.to_string() }))))
}

pub async fn contact(
    State(ctx): State<ApiContext>,
    Json(form): Json<ContactMessage>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let persistence = ctx.persistence.clone();
    let id = tokio::task::spawn_blocking(move || submit_contact(persistence.as_ref(), &form))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok((StatusCode::CREATED, Json(json!({ "id": id.to_string() }))))
}

pub async fn provider_signup(
    State(ctx): State<ApiContext>,
    Json(form): Json<ProviderSignup>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let persistence = ctx.persistence.clone();
    let id =
        tokio::task::spawn_blocking(move || submit_provider_signup(persistence.as_ref(), &form))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok((StatusCode::CREATED, Json(json!({ "id": id.to_string() }))))
}
