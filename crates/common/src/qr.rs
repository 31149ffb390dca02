//! Printable QR codes for student login cards

use crate::errors::{AppError, Result};
use qrcode::render::svg;
use qrcode::QrCode;

/// Render `login_id` as a standalone SVG document
pub fn login_qr_svg(login_id: &str) -> Result<String> {
    let code = QrCode::new(login_id.as_bytes()).map_err(|e| AppError::Internal {
        message: format!("Failed to encode QR code: {}", e),
    })?;

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(300, 300)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

/// Download name for a student's card
pub fn qr_filename(student_id: &str) -> String {
    format!("{}_qr_code.svg", student_id)
}
