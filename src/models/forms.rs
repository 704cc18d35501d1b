//! Flat form-field records assembled from client submissions.
//!
//! Each record is inserted as a single row into a named hosted-database
//! collection and never read back — fire-and-forget writes, so there is no
//! local lifecycle beyond submission (see `forms::submit_*`).

use serde::{Deserialize, Serialize};

/// Booking request, optionally pre-filled with a finalized quote.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub zip: String,
    /// Requested pickup date (YYYY-MM-DD).
    pub preferred_date: String,
    /// Requested arrival window, e.g. "8am-12pm".
    pub time_window: String,
    /// Free-text description of what needs to go.
    pub item_summary: String,
    /// Populated when the booking was reached through the quote flow —
    /// `"2x Sofa"`-style lines from the handed-off `QuoteEstimate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_detected: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Contact-page message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
}

/// Hauler partner application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSignup {
    pub business_name: String,
    pub contact_name: String,
    pub phone: String,
    pub email: String,
    /// ZIP codes the provider services.
    pub service_zips: Vec<String>,
    pub truck_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_round_trips_without_quote_fields() {
        let booking = BookingRequest {
            name: "Dana Smith".into(),
            phone: "555-0100".into(),
            email: "dana@example.com".into(),
            address: "12 Oak St".into(),
            zip: "30301".into(),
            preferred_date: "2026-09-04".into(),
            time_window: "8am-12pm".into(),
            item_summary: "Old couch and boxes".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&booking).unwrap();
        // Absent quote fields are omitted, not null
        assert!(json.get("items_detected").is_none());
        assert!(json.get("price_min").is_none());

        let back: BookingRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back.name, "Dana Smith");
        assert!(back.items_detected.is_none());
    }

    #[test]
    fn booking_carries_quote_fields_when_present() {
        let booking = BookingRequest {
            items_detected: Some(vec!["2x Sofa".into()]),
            price_min: Some(199.0),
            price_max: Some(279.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["items_detected"][0], "2x Sofa");
        assert_eq!(json["price_max"], 279.0);
    }
}
