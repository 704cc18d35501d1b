//! Client photo normalization before model transmission.
//!
//! Phone photos arrive large and often rotated. Normalization decodes,
//! applies EXIF orientation, caps the longest edge at 1920 preserving the
//! aspect ratio, and re-encodes as JPEG quality 80. Decode failures reject
//! the whole operation — there is no retry or partial output.

use std::io::Cursor;

use base64::Engine as _;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageOutputFormat};
use tracing::debug;

use super::QuoteError;

// ──────────────────────────────────────────────
// Constants
// ──────────────────────────────────────────────

/// Longest edge of the normalized photo.
pub const MAX_EDGE: u32 = 1920;

/// JPEG re-encode quality (0-100).
pub const JPEG_QUALITY: u8 = 80;

/// Smallest plausible image file (smallest valid PNG is ~67 bytes).
const MIN_IMAGE_BYTES: usize = 67;

/// Reject oversized uploads before decoding. Prevents OOM on corrupt or
/// adversarial files.
const MAX_IMAGE_BYTES: usize = 25 * 1024 * 1024; // 25 MB

/// A photo normalized for model input.
#[derive(Debug, Clone)]
pub struct NormalizedPhoto {
    /// JPEG-encoded bytes, longest edge <= `MAX_EDGE`.
    pub jpeg_bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl NormalizedPhoto {
    pub fn mime(&self) -> &'static str {
        "image/jpeg"
    }

    /// Base64 body without the data-URI prefix, as the model API wants it.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.jpeg_bytes)
    }

    /// `data:image/jpeg;base64,...` form carried through the booking handoff.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime(), self.to_base64())
    }
}

/// Normalize an arbitrary user-selected image for transmission.
pub fn normalize_photo(bytes: &[u8]) -> Result<NormalizedPhoto, QuoteError> {
    validate_image_bytes(bytes)?;

    let img = image::load_from_memory(bytes)
        .map_err(|e| QuoteError::ImageProcessing(format!("Failed to decode image: {e}")))?;
    let (orig_w, orig_h) = img.dimensions();

    let img = apply_orientation(img, read_exif_orientation(bytes));

    let (w, h) = img.dimensions();
    let (new_w, new_h) = compute_capped_dimensions(w, h, MAX_EDGE);
    let resized = if (new_w, new_h) == (w, h) {
        img
    } else {
        DynamicImage::ImageRgb8(image::imageops::resize(
            &img.to_rgb8(),
            new_w,
            new_h,
            FilterType::CatmullRom,
        ))
    };

    let jpeg_bytes = encode_jpeg(&resized)?;

    debug!(
        original = format!("{orig_w}x{orig_h}"),
        normalized = format!("{new_w}x{new_h}"),
        jpeg_size = jpeg_bytes.len(),
        "Photo normalized for model input"
    );

    Ok(NormalizedPhoto {
        jpeg_bytes,
        width: new_w,
        height: new_h,
    })
}

/// Decode an inbound image payload: either a `data:` URI or bare base64.
pub fn decode_image_payload(payload: &str) -> Result<Vec<u8>, QuoteError> {
    let b64 = match payload.split_once(";base64,") {
        Some((_, body)) => body,
        None => payload,
    };
    base64::engine::general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|e| QuoteError::ImageProcessing(format!("Invalid base64 image payload: {e}")))
}

/// Scale dimensions so the longer edge equals `cap`, aspect preserved.
/// Images already within the cap are untouched — no upscaling.
pub fn compute_capped_dimensions(width: u32, height: u32, cap: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (1, 1);
    }

    let longest = width.max(height);
    if longest <= cap {
        return (width, height);
    }

    let scale = cap as f32 / longest as f32;
    let new_w = ((width as f32 * scale).round() as u32).max(1);
    let new_h = ((height as f32 * scale).round() as u32).max(1);
    (new_w, new_h)
}

fn validate_image_bytes(bytes: &[u8]) -> Result<(), QuoteError> {
    if bytes.len() < MIN_IMAGE_BYTES {
        return Err(QuoteError::ImageProcessing(
            "Image data too small to be valid".into(),
        ));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(QuoteError::ImageProcessing(format!(
            "Image data exceeds {}MB limit",
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, QuoteError> {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageOutputFormat::Jpeg(JPEG_QUALITY))
        .map_err(|e| QuoteError::ImageProcessing(format!("JPEG encoding failed: {e}")))?;
    Ok(cursor.into_inner())
}

// ──────────────────────────────────────────────
// EXIF orientation
// ──────────────────────────────────────────────

/// Read EXIF orientation tag 0x0112 from raw bytes. 1 (normal) if absent.
fn read_exif_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    let reader = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(r) => r,
        Err(_) => return 1,
    };

    reader
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(1)
}

fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        1 => img,
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}
