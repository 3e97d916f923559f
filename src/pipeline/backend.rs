//! Backend resolution: which PDF renderer this process uses.
//!
//! A backend is anything that can open a PDF byte stream and rasterise its
//! pages. Capabilities are probed in a fixed priority order and the first one
//! that works becomes the active backend for the rest of the process; callers
//! hold it in an [`crate::batch::Engine`], never in a global.
//!
//! | Priority | Backend | Page geometry |
//! |----------|---------|---------------|
//! | 1 | [`BackendKind::Pdfium`]  | native, in points |
//! | 2 | [`BackendKind::Poppler`] | derived from raster size and DPI |
//!
//! With no backend, PDF inputs fail with
//! [`crate::error::ItemError::BackendUnavailable`]; images are unaffected.

use crate::error::ItemError;
use crate::pipeline::{pdfium, poppler};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Size of a PDF page in points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageGeometry {
    /// Geometry implied by a raster of `width_px × height_px` rendered at `dpi`.
    pub fn from_raster(width_px: u32, height_px: u32, dpi: f32) -> Self {
        Self {
            width_pt: width_px as f32 * 72.0 / dpi,
            height_pt: height_px as f32 * 72.0 / dpi,
        }
    }
}

/// One rasterised PDF page. Transient: lives until it has been inverted.
pub struct RasterPage {
    /// 0-based page index.
    pub page_index: usize,
    pub image: DynamicImage,
    /// Scale factor the page was rendered at.
    pub scale: f32,
    /// Size of the original page, independent of `scale`.
    pub geometry: PageGeometry,
}

impl RasterPage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl fmt::Debug for RasterPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterPage")
            .field("page_index", &self.page_index)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("scale", &self.scale)
            .field("geometry", &self.geometry)
            .finish()
    }
}

/// An opened PDF. Native resources are released when the handle is dropped,
/// on every exit path.
pub trait PdfHandle {
    fn page_count(&self) -> usize;

    /// Rasterise the 0-based page `index` at `scale` (relative to
    /// [`crate::config::BASE_DPI`]).
    fn rasterize_page(&mut self, index: usize, scale: f32) -> Result<RasterPage, ItemError>;
}

/// A PDF decoding and rasterisation capability.
pub trait RenderBackend: Send + Sync {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Whether page geometry comes from the document itself rather than
    /// being inferred from the raster.
    fn reports_native_geometry(&self) -> bool;

    /// Parse `pdf_bytes`, failing with [`ItemError::Decode`] on invalid input.
    fn open<'a>(&'a self, pdf_bytes: &'a [u8]) -> Result<Box<dyn PdfHandle + 'a>, ItemError>;

    /// Number of pages in `pdf_bytes`.
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ItemError> {
        Ok(self.open(pdf_bytes)?.page_count())
    }
}

/// Built-in backend capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    /// PDFium via `pdfium-render`.
    Pdfium,
    /// poppler-utils `pdftoppm` / `pdfinfo` on `PATH`.
    Poppler,
}

impl BackendKind {
    /// Probe order: richer page-geometry access first.
    pub const PRIORITY: [BackendKind; 2] = [BackendKind::Pdfium, BackendKind::Poppler];

    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Pdfium => "pdfium",
            BackendKind::Poppler => "poppler",
        }
    }

    /// Try to bring this capability up in the current process.
    pub fn probe(self) -> Result<Arc<dyn RenderBackend>, String> {
        match self {
            BackendKind::Pdfium => pdfium::PdfiumBackend::bind()
                .map(|b| Arc::new(b) as Arc<dyn RenderBackend>)
                .map_err(|e| e.to_string()),
            BackendKind::Poppler => poppler::PopplerBackend::probe()
                .map(|b| Arc::new(b) as Arc<dyn RenderBackend>),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Probe every capability and return the available ones in priority order.
pub fn detect_backends() -> Vec<Arc<dyn RenderBackend>> {
    BackendKind::PRIORITY
        .iter()
        .filter_map(|kind| match kind.probe() {
            Ok(backend) => Some(backend),
            Err(reason) => {
                debug!("Backend {} unavailable: {}", kind, reason);
                None
            }
        })
        .collect()
}

/// Pick the first capability that probes successfully, or `None`.
///
/// Probing stops at the first success, so lower-priority backends are never
/// touched when a better one is present.
pub fn select_backend() -> Option<Arc<dyn RenderBackend>> {
    let selected = BackendKind::PRIORITY
        .iter()
        .find_map(|kind| match kind.probe() {
            Ok(backend) => Some(backend),
            Err(reason) => {
                debug!("Backend {} unavailable: {}", kind, reason);
                None
            }
        });

    match &selected {
        Some(backend) => info!("PDF backend: {}", backend.name()),
        None => info!("No PDF backend available; PDF inputs will be rejected"),
    }
    selected
}
