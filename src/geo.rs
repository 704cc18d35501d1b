//! Address autocomplete and ZIP lookup against public geocoding services.
//!
//! Autocomplete queries a Photon-style forward geocoder and keeps only
//! street-level results. ZIP lookup uses a Zippopotam-style service where
//! an unknown code is a 404, surfaced here as `Ok(None)` rather than an
//! error.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Shortest query worth sending to the geocoder.
pub const MIN_AUTOCOMPLETE_CHARS: usize = 3;
/// Client-side debounce interval the API advertises to front ends.
pub const AUTOCOMPLETE_DEBOUNCE_MS: u64 = 300;

const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Geocoding service is not reachable at {0}")]
    Connection(String),
    #[error("Geocoding service returned error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("HTTP client error: {0}")]
    HttpClient(String),
    #[error("Could not parse geocoder response: {0}")]
    ResponseParsing(String),
}

/// Exactly five ASCII digits.
pub fn is_valid_zip(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AddressSuggestion {
    pub label: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ZipPlace {
    pub city: String,
    pub state: String,
}

/// Geocoding seam for address autocomplete and ZIP lookup.
pub trait GeoClient: Send + Sync {
    fn search_addresses(&self, query: &str) -> Result<Vec<AddressSuggestion>, GeoError>;
    /// `Ok(None)` means the code is well formed but unknown.
    fn lookup_zip(&self, zip: &str) -> Result<Option<ZipPlace>, GeoError>;
}

/// Client over public Photon and Zippopotam endpoints.
pub struct HostedGeoClient {
    geocoder_base: String,
    postal_base: String,
    client: reqwest::blocking::Client,
}

impl HostedGeoClient {
    pub fn new(geocoder_base: impl Into<String>, postal_base: impl Into<String>) -> Self {
        Self {
            geocoder_base: geocoder_base.into(),
            postal_base: postal_base.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn map_transport(&self, base: &str, e: reqwest::Error) -> GeoError {
        if e.is_connect() {
            GeoError::Connection(base.to_string())
        } else {
            GeoError::HttpClient(e.to_string())
        }
    }
}

// Photon wire shapes (GeoJSON feature collection)
#[derive(Deserialize)]
struct PhotonResponse {
    features: Vec<PhotonFeature>,
}

#[derive(Deserialize)]
struct PhotonFeature {
    properties: PhotonProperties,
}

#[derive(Deserialize)]
struct PhotonProperties {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    street: Option<String>,
    #[serde(default)]
    housenumber: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    postcode: Option<String>,
}

// Zippopotam wire shapes
#[derive(Deserialize)]
struct ZipResponse {
    places: Vec<ZipResponsePlace>,
}

#[derive(Deserialize)]
struct ZipResponsePlace {
    #[serde(rename = "place name")]
    place_name: String,
    #[serde(rename = "state abbreviation")]
    state_abbreviation: String,
}

impl GeoClient for HostedGeoClient {
    fn search_addresses(&self, query: &str) -> Result<Vec<AddressSuggestion>, GeoError> {
        let query = query.trim();
        if query.chars().count() < MIN_AUTOCOMPLETE_CHARS {
            return Ok(Vec::new());
        }

        let url = format!("{}/api", self.geocoder_base);
        debug!(query, "Address autocomplete request");
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("limit", "10"), ("lang", "en")])
            .send()
            .map_err(|e| self.map_transport(&self.geocoder_base, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GeoError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PhotonResponse = response
            .json()
            .map_err(|e| GeoError::ResponseParsing(e.to_string()))?;

        let suggestions = parsed
            .features
            .into_iter()
            .filter_map(|feature| suggestion_from_properties(feature.properties))
            .take(MAX_SUGGESTIONS)
            .collect();
        Ok(suggestions)
    }

    fn lookup_zip(&self, zip: &str) -> Result<Option<ZipPlace>, GeoError> {
        let url = format!("{}/us/{}", self.postal_base, zip);
        debug!(zip, "ZIP lookup request");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.map_transport(&self.postal_base, e))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GeoError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ZipResponse = response
            .json()
            .map_err(|e| GeoError::ResponseParsing(e.to_string()))?;

        Ok(parsed.places.into_iter().next().map(|place| ZipPlace {
            city: place.place_name,
            state: place.state_abbreviation,
        }))
    }
}

/// Keep only street-level results; region and POI hits are noise here.
fn suggestion_from_properties(props: PhotonProperties) -> Option<AddressSuggestion> {
    let street = props.street.or(props.name)?;
    let city = props.city.unwrap_or_default();
    let state = props.state.unwrap_or_default();
    let postcode = props.postcode.unwrap_or_default();

    let street_line = match props.housenumber {
        Some(number) => format!("{number} {street}"),
        None => street,
    };
    let label = [street_line.as_str(), city.as_str(), state.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    Some(AddressSuggestion {
        label,
        street: street_line,
        city,
        state,
        postcode,
    })
}

/// Canned geocoder for router tests.
pub struct MockGeoClient {
    pub suggestions: Vec<AddressSuggestion>,
    pub zip_place: Option<ZipPlace>,
    fail_with: Option<String>,
}

impl MockGeoClient {
    pub fn new() -> Self {
        Self {
            suggestions: Vec::new(),
            zip_place: None,
            fail_with: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            suggestions: Vec::new(),
            zip_place: None,
            fail_with: Some(message.into()),
        }
    }
}

impl Default for MockGeoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoClient for MockGeoClient {
    fn search_addresses(&self, query: &str) -> Result<Vec<AddressSuggestion>, GeoError> {
        if let Some(message) = &self.fail_with {
            return Err(GeoError::Connection(message.clone()));
        }
        if query.trim().chars().count() < MIN_AUTOCOMPLETE_CHARS {
            return Ok(Vec::new());
        }
        Ok(self.suggestions.clone())
    }

    fn lookup_zip(&self, _zip: &str) -> Result<Option<ZipPlace>, GeoError> {
        if let Some(message) = &self.fail_with {
            return Err(GeoError::Connection(message.clone()));
        }
        Ok(self.zip_place.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_validation() {
        assert!(is_valid_zip("97214"));
        assert!(is_valid_zip("00501"));
        assert!(!is_valid_zip("9721"));
        assert!(!is_valid_zip("972145"));
        assert!(!is_valid_zip("97-21"));
        assert!(!is_valid_zip("ninety"));
    }

    #[test]
    fn parses_photon_features_keeping_streets() {
        let body = r#"{
            "features": [
                {"properties": {"street": "Elm St", "housenumber": "12", "city": "Portland", "state": "Oregon", "postcode": "97214"}},
                {"properties": {"city": "Portland", "state": "Oregon"}},
                {"properties": {"name": "Main St", "city": "Salem", "state": "Oregon"}}
            ]
        }"#;
        let parsed: PhotonResponse = serde_json::from_str(body).unwrap();
        let suggestions: Vec<_> = parsed
            .features
            .into_iter()
            .filter_map(|f| suggestion_from_properties(f.properties))
            .collect();

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].street, "12 Elm St");
        assert_eq!(suggestions[0].label, "12 Elm St, Portland, Oregon");
        assert_eq!(suggestions[1].street, "Main St");
    }

    #[test]
    fn parses_zippopotam_place() {
        let body = r#"{
            "post code": "97214",
            "country": "United States",
            "places": [
                {"place name": "Portland", "state": "Oregon", "state abbreviation": "OR"}
            ]
        }"#;
        let parsed: ZipResponse = serde_json::from_str(body).unwrap();
        let place = parsed.places.into_iter().next().unwrap();
        assert_eq!(place.place_name, "Portland");
        assert_eq!(place.state_abbreviation, "OR");
    }

    #[test]
    fn short_queries_return_empty_without_calling_out() {
        let mock = MockGeoClient {
            suggestions: vec![AddressSuggestion {
                label: "12 Elm St, Portland, Oregon".into(),
                street: "12 Elm St".into(),
                city: "Portland".into(),
                state: "Oregon".into(),
                postcode: "97214".into(),
            }],
            zip_place: None,
            fail_with: None,
        };
        assert!(mock.search_addresses("el").unwrap().is_empty());
        assert_eq!(mock.search_addresses("elm").unwrap().len(), 1);
    }
}
