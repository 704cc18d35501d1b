//! Liveness endpoint.

use axum::Json;
use serde_json::{json, Value};

use crate::config;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": config::APP_VERSION,
    }))
}
