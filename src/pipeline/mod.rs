pub mod client;
pub mod corrector;
pub mod detect;
pub mod normalize;
pub mod pricing;

pub use client::*;
pub use corrector::*;
pub use detect::*;
pub use normalize::*;
pub use pricing::*;

use thiserror::Error;

/// Errors from the photo-to-estimate pipeline.
///
/// Externally sourced payloads are untrusted: shape problems surface as
/// `SchemaMismatch`, distinct from transport (`Connection` / `HttpClient`)
/// and upstream API (`Api`) failures, so callers can tell them apart even
/// though the UI collapses them into one retriable state.
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Model API is not reachable at {0}")]
    Connection(String),

    #[error("Model API returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed model response: {0}")]
    JsonParsing(String),

    #[error("Model response missing required fields: {0}")]
    SchemaMismatch(String),

    #[error("Could not process image: {0}")]
    ImageProcessing(String),

    #[error("At least one item is required for a price estimate")]
    EmptyItemList,
}
