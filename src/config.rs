use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "Haulquote";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address for the API server.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Default model used for both photo item detection and price estimation.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{}=info,tower_http=info", env!("CARGO_PKG_NAME"))
}

/// Runtime settings, resolved once at startup from the environment.
///
/// Every external collaborator (model API, hosted database, geocoder,
/// postal lookup) is configured here and injected into the clients that
/// talk to it — no module-level singletons.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Socket address the API server binds to.
    pub bind_addr: SocketAddr,
    /// Base URL of the hosted generative model API.
    pub model_api_base: String,
    /// API key for the model API.
    pub model_api_key: String,
    /// Vision-capable model used for photo item detection.
    pub vision_model: String,
    /// Text model used for rubric-based price estimation.
    pub pricing_model: String,
    /// Base URL of the hosted database's REST surface.
    pub db_base_url: String,
    /// API key for the hosted database.
    pub db_api_key: String,
    /// Base URL of the address geocoding search endpoint.
    pub geocoder_base: String,
    /// Base URL of the postal (ZIP) lookup endpoint.
    pub postal_base: String,
}

impl Settings {
    /// Resolve settings from environment variables, with development
    /// defaults for everything except the two API keys.
    pub fn from_env() -> Self {
        let bind_addr = env_or("HAULQUOTE_BIND", DEFAULT_BIND_ADDR)
            .parse()
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.parse().expect("default bind addr is valid"));

        Self {
            bind_addr,
            model_api_base: env_or(
                "HAULQUOTE_MODEL_API_BASE",
                "https://generativelanguage.googleapis.com",
            ),
            model_api_key: env_or("HAULQUOTE_MODEL_API_KEY", ""),
            vision_model: env_or("HAULQUOTE_VISION_MODEL", DEFAULT_MODEL),
            pricing_model: env_or("HAULQUOTE_PRICING_MODEL", DEFAULT_MODEL),
            db_base_url: env_or("HAULQUOTE_DB_URL", "http://localhost:54321"),
            db_api_key: env_or("HAULQUOTE_DB_API_KEY", ""),
            geocoder_base: env_or("HAULQUOTE_GEOCODER_BASE", "https://photon.komoot.io"),
            postal_base: env_or("HAULQUOTE_POSTAL_BASE", "https://api.zippopotam.us"),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_addr_parses() {
        let addr: SocketAddr = DEFAULT_BIND_ADDR.parse().unwrap();
        assert_eq!(addr.port(), 8787);
    }

    #[test]
    fn app_name_is_haulquote() {
        assert_eq!(APP_NAME, "Haulquote");
    }

    #[test]
    fn log_filter_mentions_crate() {
        assert!(default_log_filter().contains("haulquote"));
    }

    #[test]
    fn settings_have_model_defaults() {
        let settings = Settings::from_env();
        assert!(!settings.vision_model.is_empty());
        assert!(!settings.pricing_model.is_empty());
        assert!(settings.model_api_base.starts_with("http"));
    }
}
