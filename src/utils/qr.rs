//! QR code rendering.

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use serde_json::json;
use std::io::Cursor;

use crate::error::AppError;

/// Minimum edge length of the rendered image in pixels.
const MIN_DIMENSION: u32 = 256;

#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("failed to encode QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("failed to write PNG: {0}")]
    Image(#[from] image::ImageError),
}

impl From<QrError> for AppError {
    fn from(e: QrError) -> Self {
        tracing::error!(error = %e, "QR rendering failed");
        AppError::internal("Failed to render QR code", json!({ "reason": e.to_string() }))
    }
}

/// Encodes `text` as a QR code and returns it as PNG bytes.
pub fn render_png(text: &str) -> Result<Vec<u8>, QrError> {
    let code = QrCode::new(text.as_bytes())?;

    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .build();

    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    Ok(bytes)
}
