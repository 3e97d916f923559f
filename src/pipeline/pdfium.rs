//! PDFium backend: native page geometry and rasterisation via `pdfium-render`.
//!
//! The pdfium C++ library keeps internal state and is not re-entrant, which
//! is one reason the orchestrator never renders two pages at once.

use crate::config::BASE_DPI;
use crate::error::{InksaverError, ItemError};
use crate::pipeline::backend::{PageGeometry, PdfHandle, RasterPage, RenderBackend};
use pdfium_render::prelude::*;
use tracing::debug;

/// Renders PDFs with a bound PDFium library.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Locate and bind PDFium (see `pdfium_locate::bind_pdfium`).
    pub fn bind() -> Result<Self, InksaverError> {
        pdfium_locate::bind_pdfium()
            .map(|pdfium| Self { pdfium })
            .map_err(|e| InksaverError::PdfiumBindingFailed(e.to_string()))
    }
}

impl RenderBackend for PdfiumBackend {
    fn name(&self) -> &str {
        "pdfium"
    }

    fn reports_native_geometry(&self) -> bool {
        true
    }

    fn open<'a>(&'a self, pdf_bytes: &'a [u8]) -> Result<Box<dyn PdfHandle + 'a>, ItemError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(|e| {
                let err_str = format!("{:?}", e);
                if err_str.contains("Password") || err_str.contains("password") {
                    ItemError::Decode {
                        detail: "document is encrypted and requires a password".into(),
                    }
                } else {
                    ItemError::Decode { detail: err_str }
                }
            })?;

        debug!("pdfium: document opened, {} pages", document.pages().len());
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl PdfHandle for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn rasterize_page(&mut self, index: usize, scale: f32) -> Result<RasterPage, ItemError> {
        let page = self
            .document
            .pages()
            .get(page_index(index)?)
            .map_err(|e| ItemError::RasterizationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })?;

        let geometry = PageGeometry {
            width_pt: page.width().value,
            height_pt: page.height().value,
        };

        // pdfium renders one pixel per point at factor 1.0.
        let render_config = PdfRenderConfig::new().scale_page_by_factor(BASE_DPI * scale / 72.0);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            ItemError::RasterizationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "pdfium: rendered page {} → {}x{} px",
            index + 1,
            image.width(),
            image.height()
        );

        Ok(RasterPage {
            page_index: index,
            image,
            scale,
            geometry,
        })
    }
}

/// pdfium addresses pages with a `u16`.
fn page_index(index: usize) -> Result<u16, ItemError> {
    u16::try_from(index).map_err(|_| ItemError::RasterizationFailed {
        page: index + 1,
        detail: format!("page index {} is beyond pdfium's page range", index),
    })
}
