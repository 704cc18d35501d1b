//! Validation and submission of the three public forms.
//!
//! Each submitter validates field-by-field, stamps the row with an id and a
//! submission timestamp, and inserts it through the persistence seam. A
//! failed insert never mutates the caller's form, so the visitor's input
//! survives a retry.

use chrono::Utc;
use serde_json::json;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::geo::is_valid_zip;
use crate::models::{BookingRequest, ContactMessage, ProviderSignup};
use crate::persist::{PersistError, PersistenceClient};

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] FormError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

fn require(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(())
}

fn require_email(field: &'static str, value: &str) -> Result<(), FormError> {
    require(field, value)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if !valid {
        return Err(FormError::InvalidField {
            field,
            reason: "not a valid email address",
        });
    }
    Ok(())
}

fn require_phone(field: &'static str, value: &str) -> Result<(), FormError> {
    require(field, value)?;
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < 10 {
        return Err(FormError::InvalidField {
            field,
            reason: "must contain at least 10 digits",
        });
    }
    Ok(())
}

pub fn validate_booking(form: &BookingRequest) -> Result<(), FormError> {
    require("name", &form.name)?;
    require_phone("phone", &form.phone)?;
    require_email("email", &form.email)?;
    require("address", &form.address)?;
    require("zip", &form.zip)?;
    if !is_valid_zip(&form.zip) {
        return Err(FormError::InvalidField {
            field: "zip",
            reason: "must be a 5-digit ZIP code",
        });
    }
    require("preferred_date", &form.preferred_date)?;
    require("time_window", &form.time_window)?;
    require("item_summary", &form.item_summary)?;
    Ok(())
}

pub fn validate_contact(form: &ContactMessage) -> Result<(), FormError> {
    require("name", &form.name)?;
    require_email("email", &form.email)?;
    require("message", &form.message)?;
    Ok(())
}

pub fn validate_provider_signup(form: &ProviderSignup) -> Result<(), FormError> {
    require("business_name", &form.business_name)?;
    require("contact_name", &form.contact_name)?;
    require_phone("phone", &form.phone)?;
    require_email("email", &form.email)?;
    if form.service_zips.is_empty() {
        return Err(FormError::MissingField("service_zips"));
    }
    if form.service_zips.iter().any(|zip| !is_valid_zip(zip)) {
        return Err(FormError::InvalidField {
            field: "service_zips",
            reason: "every entry must be a 5-digit ZIP code",
        });
    }
    if form.truck_count == 0 {
        return Err(FormError::InvalidField {
            field: "truck_count",
            reason: "must be at least 1",
        });
    }
    Ok(())
}

/// Validate and insert a booking request, returning the stored row id.
pub fn submit_booking(
    client: &dyn PersistenceClient,
    form: &BookingRequest,
) -> Result<Uuid, SubmitError> {
    validate_booking(form)?;

    let id = Uuid::new_v4();
    let mut row = serde_json::to_value(form).unwrap_or_else(|_| json!({}));
    row["id"] = json!(id.to_string());
    row["submitted_at"] = json!(Utc::now().to_rfc3339());
    client.insert("bookings", &row)?;

    info!(%id, "Booking request stored");
    Ok(id)
}

/// Validate and insert a contact message, returning the stored row id.
pub fn submit_contact(
    client: &dyn PersistenceClient,
    form: &ContactMessage,
) -> Result<Uuid, SubmitError> {
    validate_contact(form)?;

    let id = Uuid::new_v4();
    let mut row = serde_json::to_value(form).unwrap_or_else(|_| json!({}));
    row["id"] = json!(id.to_string());
    row["submitted_at"] = json!(Utc::now().to_rfc3339());
    client.insert("contact_messages", &row)?;

    info!(%id, "Contact message stored");
    Ok(id)
}

/// Validate and insert a provider signup, returning the stored row id.
pub fn submit_provider_signup(
    client: &dyn PersistenceClient,
    form: &ProviderSignup,
) -> Result<Uuid, SubmitError> {
    validate_provider_signup(form)?;

    let id = Uuid::new_v4();
    let mut row = serde_json::to_value(form).unwrap_or_else(|_| json!({}));
    row["id"] = json!(id.to_string());
    row["submitted_at"] = json!(Utc::now().to_rfc3339());
    client.insert("provider_signups", &row)?;

    info!(%id, "Provider signup stored");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MockPersistenceClient;

    fn booking() -> BookingRequest {
        BookingRequest {
            name: "Pat Doyle".into(),
            phone: "555-010-2030".into(),
            email: "pat@example.com".into(),
            address: "12 Elm St".into(),
            zip: "97214".into(),
            preferred_date: "2026-09-04".into(),
            time_window: "Morning (8am-12pm)".into(),
            item_summary: "2x Sofa, 1x Mattress".into(),
            items_detected: Some(vec!["2x Sofa".into(), "1x Mattress".into()]),
            estimated_volume: Some("About 1/2 truck load".into()),
            price_min: Some(319.0),
            price_max: Some(399.0),
            notes: None,
        }
    }

    #[test]
    fn valid_booking_is_stored_with_stamps() {
        let mock = MockPersistenceClient::new();
        let id = submit_booking(&mock, &booking()).unwrap();

        let rows = mock.inserted();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "bookings");
        assert_eq!(rows[0].1["id"], id.to_string());
        assert_eq!(rows[0].1["name"], "Pat Doyle");
        assert_eq!(rows[0].1["price_min"], 319.0);
        assert!(rows[0].1["submitted_at"].is_string());
    }

    #[test]
    fn booking_without_quote_context_still_stores() {
        let mut form = booking();
        form.items_detected = None;
        form.estimated_volume = None;
        form.price_min = None;
        form.price_max = None;

        let mock = MockPersistenceClient::new();
        submit_booking(&mock, &form).unwrap();
        let row = &mock.inserted()[0].1;
        assert!(row.get("items_detected").is_none());
        assert!(row.get("price_min").is_none());
    }

    #[test]
    fn blank_name_is_rejected_before_insert() {
        let mut form = booking();
        form.name = "   ".into();

        let mock = MockPersistenceClient::new();
        let err = submit_booking(&mock, &form).unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Invalid(FormError::MissingField("name"))
        ));
        assert!(mock.inserted().is_empty());
    }

    #[test]
    fn bad_zip_is_rejected() {
        let mut form = booking();
        form.zip = "9721".into();
        assert!(matches!(
            validate_booking(&form),
            Err(FormError::InvalidField { field: "zip", .. })
        ));
    }

    #[test]
    fn bad_email_is_rejected() {
        let mut form = booking();
        form.email = "pat-at-example".into();
        assert!(matches!(
            validate_booking(&form),
            Err(FormError::InvalidField { field: "email", .. })
        ));
    }

    #[test]
    fn short_phone_is_rejected() {
        let mut form = booking();
        form.phone = "555-1234".into();
        assert!(matches!(
            validate_booking(&form),
            Err(FormError::InvalidField { field: "phone", .. })
        ));
    }

    #[test]
    fn insert_failure_leaves_form_untouched() {
        let mock = MockPersistenceClient::failing("db down");
        let form = booking();
        let snapshot = serde_json::to_value(&form).unwrap();

        let err = submit_booking(&mock, &form).unwrap_err();
        assert!(matches!(err, SubmitError::Persist(_)));
        assert_eq!(serde_json::to_value(&form).unwrap(), snapshot);
    }

    #[test]
    fn contact_message_stores() {
        let mock = MockPersistenceClient::new();
        let form = ContactMessage {
            name: "Sam".into(),
            email: "sam@example.com".into(),
            phone: None,
            message: "Do you haul pianos?".into(),
        };
        submit_contact(&mock, &form).unwrap();
        assert_eq!(mock.inserted()[0].0, "contact_messages");
    }

    #[test]
    fn provider_signup_requires_service_zips() {
        let form = ProviderSignup {
            business_name: "Haul Bros".into(),
            contact_name: "Lee".into(),
            phone: "503-555-0100".into(),
            email: "lee@haulbros.example".into(),
            service_zips: vec![],
            truck_count: 2,
            notes: None,
        };
        assert_eq!(
            validate_provider_signup(&form),
            Err(FormError::MissingField("service_zips"))
        );
    }

    #[test]
    fn provider_signup_rejects_zero_trucks() {
        let form = ProviderSignup {
            business_name: "Haul Bros".into(),
            contact_name: "Lee".into(),
            phone: "503-555-0100".into(),
            email: "lee@haulbros.example".into(),
            service_zips: vec!["97214".into()],
            truck_count: 0,
            notes: None,
        };
        assert!(matches!(
            validate_provider_signup(&form),
            Err(FormError::InvalidField {
                field: "truck_count",
                ..
            })
        ));
    }
}
