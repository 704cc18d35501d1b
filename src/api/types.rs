//! Shared state handed to every endpoint.

use std::sync::Arc;

use crate::config::Settings;
use crate::geo::GeoClient;
use crate::persist::PersistenceClient;
use crate::pipeline::client::{LlmClient, VisionClient};

/// Handler context: trait objects for every outbound dependency, so router
/// tests swap in mocks without touching the handlers.
#[derive(Clone)]
pub struct ApiContext {
    pub vision: Arc<dyn VisionClient>,
    pub llm: Arc<dyn LlmClient>,
    pub persistence: Arc<dyn PersistenceClient>,
    pub geo: Arc<dyn GeoClient>,
    pub settings: Arc<Settings>,
}

impl ApiContext {
    pub fn new(
        vision: Arc<dyn VisionClient>,
        llm: Arc<dyn LlmClient>,
        persistence: Arc<dyn PersistenceClient>,
        geo: Arc<dyn GeoClient>,
        settings: Settings,
    ) -> Self {
        Self {
            vision,
            llm,
            persistence,
            geo,
            settings: Arc::new(settings),
        }
    }
}
