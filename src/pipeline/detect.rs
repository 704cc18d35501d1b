//! Photo item detection via the vision model.
//!
//! Sends the normalized photo with a fixed instruction and parses the
//! JSON-constrained reply into `DetectedItem`s. The response is untrusted:
//! a missing or mistyped `items` array is a hard `SchemaMismatch` — there
//! is no partial recovery, only caller-initiated retry of the same request.

use std::sync::Arc;

use tracing::info;

use super::client::VisionClient;
use super::QuoteError;
use crate::models::DetectedItem;

/// Upper bound on detected items kept from one photo.
pub const MAX_DETECTED_ITEMS: usize = 20;

/// Fixed detection instruction. The model must answer with a JSON object
/// of the shape `{"items": ["..."]}`.
const DETECTION_PROMPT: &str = "\
You are helping a junk removal service identify items in a customer photo.\n\
List every distinct junk item you can see. Rules:\n\
- Use specific names (\"3-seat leather sofa\", not \"furniture\").\n\
- Merge many small similar things into one grouped entry \
(\"Pile of cardboard boxes\", \"Bags of clothes\").\n\
- List each distinct item once; do not repeat entries.\n\
- At most 20 entries.\n\
Respond with ONLY a JSON object: {\"items\": [\"item name\", ...]}";

/// Item detector over an injected vision client.
pub struct ItemDetector {
    vision: Arc<dyn VisionClient>,
    model: String,
}

impl ItemDetector {
    pub fn new(vision: Arc<dyn VisionClient>, model: impl Into<String>) -> Self {
        Self {
            vision,
            model: model.into(),
        }
    }

    /// Detect items in a normalized photo (base64 body + MIME type).
    ///
    /// Returns 1 to `MAX_DETECTED_ITEMS` items, each with quantity 1 and a
    /// fresh id. An empty detection is a failure, not an empty success.
    pub fn detect(&self, image_b64: &str, mime: &str) -> Result<Vec<DetectedItem>, QuoteError> {
        let _span = tracing::info_span!("detect_items", model = %self.model).entered();
        let start = std::time::Instant::now();

        let raw = self
            .vision
            .generate_with_image(&self.model, DETECTION_PROMPT, image_b64, mime)?;

        let names = parse_items_response(&raw)?;
        let items: Vec<DetectedItem> = names
            .into_iter()
            .take(MAX_DETECTED_ITEMS)
            .map(DetectedItem::new)
            .collect();

        info!(
            model = %self.model,
            elapsed_ms = %start.elapsed().as_millis(),
            items = items.len(),
            "Photo item detection complete"
        );

        Ok(items)
    }
}

/// Parse the model's reply into item names, strictly.
///
/// Accepts the raw JSON object, optionally wrapped in ```json fences.
/// The `items` field must be present and must be an array of strings;
/// anything else is `SchemaMismatch`. Blank names are dropped, and a
/// result with no usable names is also `SchemaMismatch`.
pub fn parse_items_response(response: &str) -> Result<Vec<String>, QuoteError> {
    let json_str = strip_json_fences(response);

    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| QuoteError::JsonParsing(e.to_string()))?;

    let items = value
        .get("items")
        .ok_or_else(|| QuoteError::SchemaMismatch("missing \"items\" field".into()))?
        .as_array()
        .ok_or_else(|| QuoteError::SchemaMismatch("\"items\" is not an array".into()))?;

    let mut names = Vec::with_capacity(items.len());
    for entry in items {
        let name = entry
            .as_str()
            .ok_or_else(|| QuoteError::SchemaMismatch("\"items\" entry is not a string".into()))?
            .trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }

    if names.is_empty() {
        return Err(QuoteError::SchemaMismatch(
            "detector returned no items".into(),
        ));
    }

    Ok(names)
}

/// Strip optional markdown code fences around a JSON body.
pub(crate) fn strip_json_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}
