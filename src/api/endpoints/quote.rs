//! Photo detection and price estimation endpoints.
//!
//! Both endpoints run their model calls on the blocking pool; the clients
//! behind the trait seams use blocking HTTP.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::{detect_error, pricing_error, ApiError};
use crate::api::types::ApiContext;
use crate::models::{DetectedItem, QuoteEstimate};
use crate::pipeline::corrector::enforce_span;
use crate::pipeline::detect::ItemDetector;
use crate::pipeline::normalize::{decode_image_payload, normalize_photo};
use crate::pipeline::pricing::PriceEstimator;

#[derive(Deserialize)]
pub struct DetectRequest {
    /// Raw base64 or a `data:image/...;base64,` URI.
    pub image: String,
}

#[derive(Serialize)]
pub struct DetectResponse {
    pub items: Vec<DetectedItem>,
}

pub async fn detect(
    State(ctx): State<ApiContext>,
    Json(request): Json<DetectRequest>,
) -> Result<Json<DetectResponse>, ApiError> {
    if request.image.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing image payload".to_string()));
    }

    let vision = ctx.vision.clone();
    let model = ctx.settings.vision_model.clone();
    let items = tokio::task::spawn_blocking(move || {
        let bytes = decode_image_payload(&request.image)?;
        let photo = normalize_photo(&bytes)?;
        let detector = ItemDetector::new(vision, model);
        detector.detect(&photo.to_base64(), photo.mime())
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?
    .map_err(detect_error)?;

    Ok(Json(DetectResponse { items }))
}

#[derive(Deserialize)]
pub struct EstimateRequest {
    pub items: Vec<EstimateItem>,
}

#[derive(Deserialize)]
pub struct EstimateItem {
    pub name: String,
    pub quantity: u32,
}

pub async fn estimate(
    State(ctx): State<ApiContext>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<QuoteEstimate>, ApiError> {
    if request.items.is_empty() {
        return Err(ApiError::BadRequest(
            "Cannot price an empty item list".to_string(),
        ));
    }

    let mut items = Vec::with_capacity(request.items.len());
    for entry in request.items {
        if entry.name.trim().is_empty() {
            return Err(ApiError::BadRequest("Item names must be non-empty".to_string()));
        }
        if entry.quantity == 0 {
            return Err(ApiError::BadRequest(
                "Item quantities must be at least 1".to_string(),
            ));
        }
        let mut item = DetectedItem::new(entry.name.trim());
        item.quantity = entry.quantity;
        items.push(item);
    }

    let llm = ctx.llm.clone();
    let model = ctx.settings.pricing_model.clone();
    let quote = tokio::task::spawn_blocking(move || {
        let estimator = PriceEstimator::new(llm, model);
        let estimate = estimator.estimate(&items)?;
        let estimate = enforce_span(estimate);
        Ok::<_, crate::pipeline::QuoteError>(QuoteEstimate::from_parts(&items, &estimate))
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?
    .map_err(pricing_error)?;

    Ok(Json(quote))
}
