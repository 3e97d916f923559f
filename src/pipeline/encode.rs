//! Image encoding: inverted `RgbImage` → bytes in the configured format.
//!
//! PNG, BMP and TIFF go through `write_to`. JPEG goes through
//! `JpegEncoder::new_with_quality` so the configured quality is honoured.

use crate::config::EncodedFormat;
use crate::error::ItemError;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use tracing::debug;

/// Encode an inverted raster. `jpeg_quality` is ignored for other formats.
pub fn encode_image(
    img: &RgbImage,
    format: EncodedFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, ItemError> {
    let mut buf = Vec::new();
    let result = match format {
        EncodedFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut buf, jpeg_quality).encode_image(img)
        }
        EncodedFormat::Png => img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png),
        EncodedFormat::Bmp => img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Bmp),
        EncodedFormat::Tiff => img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Tiff),
    };
    result.map_err(|e| ItemError::EncodeFailed {
        format: format.name().to_string(),
        detail: e.to_string(),
    })?;

    debug!(
        "Encoded {}x{} image → {} bytes {}",
        img.width(),
        img.height(),
        buf.len(),
        format.name()
    );
    Ok(buf)
}
