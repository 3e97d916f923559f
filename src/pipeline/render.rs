//! PDF rasterisation through whichever backend the engine holds.
//!
//! The orchestrator walks a document page by page via [`for_each_page`] so
//! that only one raster is alive at a time. [`render`] collects the whole
//! document and is mostly useful to callers that want every page at once.
//!
//! Both run on the calling thread. Backends wrap blocking native code, so the
//! async entry point moves the whole batch onto `spawn_blocking` instead of
//! doing it here.

use crate::error::ItemError;
use crate::pipeline::backend::{RasterPage, RenderBackend};
use tracing::{debug, warn};

/// Number of pages in `pdf_bytes`, used to precompute progress units.
pub fn page_count(backend: Option<&dyn RenderBackend>, pdf_bytes: &[u8]) -> Result<usize, ItemError> {
    let backend = backend.ok_or(ItemError::BackendUnavailable)?;
    backend.page_count(pdf_bytes)
}

/// Rasterise every page of `pdf_bytes` at `scale`, in page order.
///
/// Any page failure fails the whole call with the first page error.
pub fn render(
    backend: Option<&dyn RenderBackend>,
    pdf_bytes: &[u8],
    scale: f32,
) -> Result<Vec<RasterPage>, ItemError> {
    let mut pages = Vec::new();
    let mut first_error = None;
    for_each_page(backend, pdf_bytes, scale, |_, _, result| match result {
        Ok(page) => pages.push(page),
        Err(e) => {
            if first_error.is_none() {
                first_error = Some(e);
            }
        }
    })?;
    match first_error {
        Some(e) => Err(e),
        None => Ok(pages),
    }
}

/// Open `pdf_bytes` and hand each page's raster (or its error) to `visit`
/// as `(index, page_count, result)`, in page order. Every page is attempted
/// even after a failure.
///
/// Returns the page count on success. An error means the document itself
/// could not be opened and `visit` was never called. The document handle is
/// dropped before this returns, whatever happened.
pub fn for_each_page<F>(
    backend: Option<&dyn RenderBackend>,
    pdf_bytes: &[u8],
    scale: f32,
    mut visit: F,
) -> Result<usize, ItemError>
where
    F: FnMut(usize, usize, Result<RasterPage, ItemError>),
{
    let backend = backend.ok_or(ItemError::BackendUnavailable)?;
    let mut handle = backend.open(pdf_bytes)?;
    let total = handle.page_count();
    debug!("{}: rasterising {} pages at {}x", backend.name(), total, scale);

    for index in 0..total {
        let result = handle.rasterize_page(index, scale);
        if let Err(ref e) = result {
            warn!("{}: page {} failed: {}", backend.name(), index + 1, e);
        }
        visit(index, total, result);
    }
    Ok(total)
}
