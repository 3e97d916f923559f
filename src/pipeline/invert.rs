//! Color inversion: normalise to 8-bit RGB, then `255 - v` per channel.
//!
//! Everything here is pure. The same transform applies to rasterised PDF
//! pages and to uploaded images.

use crate::error::ItemError;
use crate::pipeline::backend::{PageGeometry, RasterPage};
use image::{DynamicImage, ImageError, RgbImage};

/// A page after inversion. Same shape as [`RasterPage`], RGB pixels.
#[derive(Debug, Clone)]
pub struct InvertedPage {
    pub page_index: usize,
    pub image: RgbImage,
    pub scale: f32,
    pub geometry: PageGeometry,
}

impl InvertedPage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Decode image bytes of any supported container.
///
/// Bytes that are not a recognisable image are a [`ItemError::Decode`], as
/// is a recognised container that turns out to be corrupt. A valid container
/// with a color layout or compression the decoder does not support is
/// [`ItemError::UnsupportedFormat`].
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ItemError> {
    let format = image::guess_format(bytes).map_err(|e| ItemError::Decode {
        detail: e.to_string(),
    })?;
    image::load_from_memory_with_format(bytes, format).map_err(decode_error)
}

/// Unsupported layouts and sub-formats are [`ItemError::UnsupportedFormat`];
/// everything else the decoder reports is [`ItemError::Decode`].
fn decode_error(err: ImageError) -> ItemError {
    match err {
        ImageError::Unsupported(u) => ItemError::UnsupportedFormat {
            detail: u.to_string(),
        },
        other => ItemError::Decode {
            detail: other.to_string(),
        },
    }
}

/// Convert any known pixel layout to 8-bit RGB. Alpha is discarded.
pub fn normalize_rgb8(image: DynamicImage) -> Result<RgbImage, ItemError> {
    match image {
        DynamicImage::ImageRgb8(rgb) => Ok(rgb),
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgba8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_)
        | DynamicImage::ImageRgb32F(_)
        | DynamicImage::ImageRgba32F(_) => Ok(image.to_rgb8()),
        other => Err(ItemError::UnsupportedFormat {
            detail: format!("no RGB conversion for {:?}", other.color()),
        }),
    }
}

/// Invert every channel of an RGB image in place.
pub fn invert_rgb8(image: &mut RgbImage) {
    for v in image.iter_mut() {
        *v = u8::MAX - *v;
    }
}

/// Normalise and invert. Width and height are unchanged; the result always
/// has three channels.
pub fn invert(image: DynamicImage) -> Result<RgbImage, ItemError> {
    let mut rgb = normalize_rgb8(image)?;
    invert_rgb8(&mut rgb);
    Ok(rgb)
}

/// Invert one rasterised PDF page, consuming the raster.
pub fn invert_page(page: RasterPage) -> Result<InvertedPage, ItemError> {
    let RasterPage {
        page_index,
        image,
        scale,
        geometry,
    } = page;
    Ok(InvertedPage {
        page_index,
        image: invert(image)?,
        scale,
        geometry,
    })
}
