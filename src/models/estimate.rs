use serde::{Deserialize, Serialize};

use super::item::{format_item_lines, DetectedItem};

/// Dollar price range shown to the user.
///
/// Every range that leaves the pipeline satisfies the span invariant:
/// `max - min == 80` (see `pipeline::corrector`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// One pricing result. Immutable after creation — a re-estimate produces
/// a new value that supersedes this one, it is never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEstimate {
    /// Descriptive volume, e.g. "About 1/4 truck load".
    pub estimated_volume: String,
    pub price_range: PriceRange,
    /// Free-text reasoning summary from the estimator.
    pub summary: String,
}

/// Denormalized quote built at handoff: the item list rendered as
/// `"2x Sofa"`-style strings plus the corrected estimate. Passed by value
/// into the booking form's initial state; the quote session ends with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteEstimate {
    pub items_detected: Vec<String>,
    pub estimated_volume: String,
    pub price_min: f64,
    pub price_max: f64,
    pub summary: String,
}

impl QuoteEstimate {
    pub fn from_parts(items: &[DetectedItem], estimate: &PriceEstimate) -> Self {
        Self {
            items_detected: format_item_lines(items),
            estimated_volume: estimate.estimated_volume.clone(),
            price_min: estimate.price_range.min,
            price_max: estimate.price_range.max,
            summary: estimate.summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_range_span() {
        let range = PriceRange { min: 150.0, max: 230.0 };
        assert!((range.span() - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn estimate_serializes_camel_case() {
        let estimate = PriceEstimate {
            estimated_volume: "About 1/4 truck load".into(),
            price_range: PriceRange { min: 199.0, max: 279.0 },
            summary: "Mixed household load".into(),
        };
        let json = serde_json::to_value(&estimate).unwrap();
        assert_eq!(json["estimatedVolume"], "About 1/4 truck load");
        assert_eq!(json["priceRange"]["min"], 199.0);
    }

    #[test]
    fn quote_estimate_formats_item_lines() {
        let mut sofa = DetectedItem::new("Sofa");
        sofa.quantity = 2;
        let items = vec![sofa, DetectedItem::new("Coffee Table")];
        let estimate = PriceEstimate {
            estimated_volume: "About 1/4 truck load".into(),
            price_range: PriceRange { min: 199.0, max: 279.0 },
            summary: String::new(),
        };

        let quote = QuoteEstimate::from_parts(&items, &estimate);
        assert_eq!(quote.items_detected, vec!["2x Sofa", "1x Coffee Table"]);
        assert_eq!(quote.price_min, 199.0);
        assert_eq!(quote.price_max, 279.0);
    }
}
