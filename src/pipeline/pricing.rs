//! Rubric-driven price estimation for a confirmed item list.
//!
//! The prompt embeds the fixed pricing rubric (volume tiers plus per-item
//! bulky rates) and demands a JSON reply with an exact $80 span. The reply
//! is shape-validated here; the span itself is enforced afterwards by
//! `corrector::enforce_span` — the model's arithmetic is never trusted.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use super::client::LlmClient;
use super::detect::strip_json_fences;
use super::QuoteError;
use crate::models::{format_item_lines, DetectedItem, PriceEstimate, PriceRange};

/// Fixed pricing rubric embedded in every estimation prompt.
///
/// Tiers run minimum-load through full truck; bulky rates cover single
/// large items priced individually.
pub const PRICING_RUBRIC: &str = "\
VOLUME TIERS (price covers labor, hauling, disposal):\n\
- Minimum Load (1-2 small items): $99-$179\n\
- 1/8 Truck: $139-$219\n\
- 1/4 Truck: $199-$279\n\
- 3/8 Truck: $269-$349\n\
- 1/2 Truck: $319-$399\n\
- 5/8 Truck: $379-$459\n\
- 3/4 Truck: $439-$519\n\
- 7/8 Truck: $499-$579\n\
- Full Truck: $549-$629\n\
\n\
BULKY ITEM RATES (per item):\n\
- Mattress or box spring: $129\n\
- Sofa or sectional piece: $159\n\
- Refrigerator or freezer: $179\n\
- Washer, dryer, or other appliance: $149\n\
- Television: $99\n\
- Treadmill or exercise machine: $199\n\
- Piano: $349\n\
- Hot tub: $399";

/// Price estimator over an injected text model client.
pub struct PriceEstimator {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl PriceEstimator {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Estimate a price range for a non-empty item list.
    ///
    /// The returned estimate is shape-validated but its span is NOT yet
    /// normalized — callers apply `corrector::enforce_span` before the
    /// value reaches a user.
    pub fn estimate(&self, items: &[DetectedItem]) -> Result<PriceEstimate, QuoteError> {
        if items.is_empty() {
            return Err(QuoteError::EmptyItemList);
        }

        let _span = tracing::info_span!("estimate_price", model = %self.model).entered();
        let start = std::time::Instant::now();

        let prompt = build_pricing_prompt(items);
        let raw = self.llm.generate(&self.model, &prompt)?;
        let estimate = parse_estimate_response(&raw)?;

        info!(
            model = %self.model,
            elapsed_ms = %start.elapsed().as_millis(),
            min = estimate.price_range.min,
            max = estimate.price_range.max,
            "Price estimation complete"
        );

        Ok(estimate)
    }
}

/// Build the estimation prompt for an item list.
pub fn build_pricing_prompt(items: &[DetectedItem]) -> String {
    let lines = format_item_lines(items).join("\n");
    format!(
        "You estimate junk removal prices for a hauling brokerage.\n\
         \n\
         {PRICING_RUBRIC}\n\
         \n\
         ITEMS TO HAUL:\n\
         {lines}\n\
         \n\
         Pick volume-tier pricing for mixed loads. For 1-3 large single \
         items, sum the bulky item rates instead and use that as the minimum.\n\
         The range must span exactly $80 (max = min + 80).\n\
         Respond with ONLY a JSON object:\n\
         {{\"estimatedVolume\": \"...\", \"priceRange\": {{\"min\": 0, \"max\": 0}}, \"summary\": \"...\"}}"
    )
}

/// Parse and shape-validate the estimator reply.
///
/// `estimatedVolume` and `priceRange` (with numeric min/max) are required;
/// their absence is `SchemaMismatch`. A missing summary is tolerated.
pub fn parse_estimate_response(response: &str) -> Result<PriceEstimate, QuoteError> {
    #[derive(Deserialize)]
    struct RawEstimate {
        #[serde(rename = "estimatedVolume")]
        estimated_volume: Option<String>,
        #[serde(rename = "priceRange")]
        price_range: Option<RawRange>,
        summary: Option<String>,
    }

    #[derive(Deserialize)]
    struct RawRange {
        min: Option<f64>,
        max: Option<f64>,
    }

    let json_str = strip_json_fences(response);
    let raw: RawEstimate = serde_json::from_str(json_str)
        .map_err(|e| QuoteError::JsonParsing(e.to_string()))?;

    let estimated_volume = raw
        .estimated_volume
        .ok_or_else(|| QuoteError::SchemaMismatch("missing \"estimatedVolume\"".into()))?;
    let range = raw
        .price_range
        .ok_or_else(|| QuoteError::SchemaMismatch("missing \"priceRange\"".into()))?;
    let min = range
        .min
        .ok_or_else(|| QuoteError::SchemaMismatch("missing \"priceRange.min\"".into()))?;
    let max = range
        .max
        .ok_or_else(|| QuoteError::SchemaMismatch("missing \"priceRange.max\"".into()))?;

    Ok(PriceEstimate {
        estimated_volume,
        price_range: PriceRange { min, max },
        summary: raw.summary.unwrap_or_default(),
    })
}
