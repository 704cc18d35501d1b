//! Route table for the public API.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use super::endpoints::{forms, geo, health, quote};
use super::types::ApiContext;

/// Build the `/api` router over a fully-wired context.
pub fn build_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        .route("/quote/detect", post(quote::detect))
        .route("/quote/estimate", post(quote::estimate))
        .route("/forms/booking", post(forms::booking))
        .route("/forms/contact", post(forms::contact))
        .route("/forms/provider-signup", post(forms::provider_signup))
        .route("/geo/address", get(geo::address))
        .route("/geo/zip/:code", get(geo::zip))
        .with_state(ctx);

    Router::new().nest("/api", api).layer(CorsLayer::permissive())
}
