//! API error type shared by all endpoints.
//!
//! Every failure surfaces to clients as `{"error": {"code", "message"}}`
//! with a matching HTTP status. Internal errors are logged server-side and
//! masked in the response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::forms::SubmitError;
use crate::geo::GeoError;
use crate::persist::PersistError;
use crate::pipeline::QuoteError;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed or invalid client input.
    BadRequest(String),
    /// Photo analysis could not produce an item list.
    AnalysisFailed(String),
    /// Price estimation failed after items were confirmed.
    PricingFailed(String),
    /// A dependent service (database, geocoder) failed.
    Upstream(String),
    /// Well-formed ZIP code with no match.
    ZipNotFound,
    /// Anything unexpected; detail stays out of the response.
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::AnalysisFailed(_) | ApiError::PricingFailed(_) | ApiError::Upstream(_) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::ZipNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::AnalysisFailed(_) => "ANALYSIS_FAILED",
            ApiError::PricingFailed(_) => "PRICING_FAILED",
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::ZipNotFound => "ZIP_NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::AnalysisFailed(msg)
            | ApiError::PricingFailed(msg)
            | ApiError::Upstream(msg) => msg.clone(),
            ApiError::ZipNotFound => "No place found for that ZIP code".to_string(),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal API error");
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.message(),
            }
        });
        (self.status(), Json(body)).into_response()
    }
}

/// Detection-path mapping: bad images are the client's fault, the rest is
/// the analysis pipeline's.
pub fn detect_error(err: QuoteError) -> ApiError {
    match err {
        QuoteError::ImageProcessing(_) => {
            ApiError::BadRequest("Could not process the photo".to_string())
        }
        other => ApiError::AnalysisFailed(other.to_string()),
    }
}

pub fn pricing_error(err: QuoteError) -> ApiError {
    match err {
        QuoteError::EmptyItemList => ApiError::BadRequest(err.to_string()),
        other => ApiError::PricingFailed(other.to_string()),
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Invalid(e) => ApiError::BadRequest(e.to_string()),
            SubmitError::Persist(e) => ApiError::Upstream(e.to_string()),
        }
    }
}

impl From<PersistError> for ApiError {
    fn from(err: PersistError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<GeoError> for ApiError {
    fn from(err: GeoError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}
