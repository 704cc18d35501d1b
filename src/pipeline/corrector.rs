//! Deterministic post-processing of model price estimates.
//!
//! Every quoted range must span exactly $80. The model is asked for this
//! in the prompt, but the guarantee lives here: the minimum is kept (after
//! clamping negatives to zero) and the maximum is recomputed from it.

use tracing::warn;

use crate::models::PriceEstimate;

/// Required width of every quoted price range, in dollars.
pub const PRICE_SPAN_USD: f64 = 80.0;

/// Force the estimate's range to span exactly [`PRICE_SPAN_USD`].
///
/// A negative minimum is clamped to 0 before the maximum is recomputed.
/// Out-of-rubric values are otherwise passed through untouched; only the
/// span is corrected.
pub fn enforce_span(mut estimate: PriceEstimate) -> PriceEstimate {
    if estimate.price_range.min < 0.0 {
        warn!(
            min = estimate.price_range.min,
            "Negative price minimum from model, clamping to 0"
        );
        estimate.price_range.min = 0.0;
    }

    let corrected_max = estimate.price_range.min + PRICE_SPAN_USD;
    if (estimate.price_range.max - corrected_max).abs() > f64::EPSILON {
        warn!(
            min = estimate.price_range.min,
            max = estimate.price_range.max,
            corrected_max,
            "Price range span was not exactly 80, recomputing max"
        );
    }
    estimate.price_range.max = corrected_max;

    estimate
}
