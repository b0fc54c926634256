use base64::Engine;
use image::{ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

use crate::error::{Error, Result};

/// Render a room identifier into a scannable code, returned as a
/// base64-encoded PNG for direct embedding in API responses.
pub fn room_code_png(room_id: &str) -> Result<String> {
    let code = QrCode::new(room_id.as_bytes()).map_err(|e| Error::Render(e.to_string()))?;

    let image = code.render::<Luma<u8>>().min_dimensions(256, 256).build();

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| Error::Render(e.to_string()))?;

    Ok(base64::engine::general_purpose::STANDARD.encode(png))
}
