use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use haulquote::api::{build_router, ApiContext};
use haulquote::config::{self, Settings};
use haulquote::geo::HostedGeoClient;
use haulquote::persist::HostedDbClient;
use haulquote::pipeline::client::HostedModelClient;

const MODEL_TIMEOUT_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = Settings::from_env();
    info!(
        name = config::APP_NAME,
        version = config::APP_VERSION,
        addr = %settings.bind_addr,
        "Starting API server"
    );

    let model_client = Arc::new(HostedModelClient::new(
        &settings.model_api_base,
        &settings.model_api_key,
        MODEL_TIMEOUT_SECS,
    ));
    let persistence = Arc::new(HostedDbClient::new(
        settings.db_base_url.clone(),
        settings.db_api_key.clone(),
    ));
    let geo = Arc::new(HostedGeoClient::new(
        settings.geocoder_base.clone(),
        settings.postal_base.clone(),
    ));

    let bind_addr = settings.bind_addr;
    let ctx = ApiContext::new(
        model_client.clone(),
        model_client,
        persistence,
        geo,
        settings,
    );

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(addr = %bind_addr, "Listening");
    axum::serve(listener, build_router(ctx)).await?;

    Ok(())
}
