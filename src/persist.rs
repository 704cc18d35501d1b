//! Hosted database access for form submissions.
//!
//! Rows go to a PostgREST-style endpoint: one POST per insert, authenticated
//! with an API key. The trait seam keeps form submitters testable without a
//! live database.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Database is not reachable at {0}")]
    Connection(String),
    #[error("Database returned error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Insert-only database seam.
pub trait PersistenceClient: Send + Sync {
    fn insert(&self, collection: &str, row: &Value) -> Result<(), PersistError>;
}

/// Client for a hosted PostgREST-compatible database.
pub struct HostedDbClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl HostedDbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl PersistenceClient for HostedDbClient {
    fn insert(&self, collection: &str, row: &Value) -> Result<(), PersistError> {
        let url = format!("{}/rest/v1/{}", self.base_url, collection);
        debug!(collection, "Inserting row");

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    PersistError::Connection(self.base_url.clone())
                } else {
                    PersistError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PersistError::Api {
                status: status.as_u16(),
                body,
            });
        }

        info!(collection, "Row inserted");
        Ok(())
    }
}

/// In-memory stand-in recording every insert.
pub struct MockPersistenceClient {
    inserted: std::sync::Mutex<Vec<(String, Value)>>,
    fail_with: Option<String>,
}

impl MockPersistenceClient {
    pub fn new() -> Self {
        Self {
            inserted: std::sync::Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            inserted: std::sync::Mutex::new(Vec::new()),
            fail_with: Some(message.into()),
        }
    }

    pub fn inserted(&self) -> Vec<(String, Value)> {
        self.inserted.lock().unwrap().clone()
    }
}

impl Default for MockPersistenceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistenceClient for MockPersistenceClient {
    fn insert(&self, collection: &str, row: &Value) -> Result<(), PersistError> {
        if let Some(message) = &self.fail_with {
            return Err(PersistError::Connection(message.clone()));
        }
        self.inserted
            .lock()
            .unwrap()
            .push((collection.to_string(), row.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mock_records_inserts() {
        let mock = MockPersistenceClient::new();
        mock.insert("bookings", &json!({"name": "Pat"})).unwrap();
        mock.insert("bookings", &json!({"name": "Sam"})).unwrap();

        let rows = mock.inserted();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, "bookings");
        assert_eq!(rows[1].1["name"], "Sam");
    }

    #[test]
    fn failing_mock_records_nothing() {
        let mock = MockPersistenceClient::failing("db down");
        let err = mock.insert("bookings", &json!({})).unwrap_err();
        assert!(matches!(err, PersistError::Connection(_)));
        assert!(mock.inserted().is_empty());
    }
}
