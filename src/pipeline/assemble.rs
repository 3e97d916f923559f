//! Document reassembly: inverted page rasters → one PDF.
//!
//! Every page becomes a single full-bleed image XObject stretched over a page
//! of the *original* size in points, whatever resolution it was rasterised
//! at. Text and vector content are not carried over.
//!
//! printpdf builds documents from `PdfPage { ops }` values and serialises them
//! in one `save()` call. Page pixels are moved into the document as soon as
//! they are pushed, so the assembler never holds a second copy.

use crate::error::ItemError;
use crate::pipeline::backend::PageGeometry;
use crate::pipeline::invert::InvertedPage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, warn};

/// Placing images at 72 DPI makes one pixel one point before scaling.
const PLACEMENT_DPI: f32 = 72.0;

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

/// Builds a PDF one inverted page at a time.
pub struct DocumentAssembler {
    doc: PdfDocument,
    pages: Vec<PdfPage>,
}

impl DocumentAssembler {
    /// Start an empty document with `title` in its metadata.
    pub fn new(title: &str) -> Self {
        Self {
            doc: PdfDocument::new(title),
            pages: Vec::new(),
        }
    }

    /// Pages pushed so far.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Append `page` as the next page, sized to `geometry`.
    pub fn push_page(&mut self, page: InvertedPage, geometry: PageGeometry) -> Result<(), ItemError> {
        let (px_w, px_h) = (page.width(), page.height());
        if px_w == 0 || px_h == 0 {
            return Err(ItemError::AssemblyFailed {
                detail: format!("page {} has an empty raster", page.page_index + 1),
            });
        }
        if !(geometry.width_pt > 0.0 && geometry.height_pt > 0.0) {
            return Err(ItemError::AssemblyFailed {
                detail: format!(
                    "page {} has invalid size {}x{} pt",
                    page.page_index + 1,
                    geometry.width_pt,
                    geometry.height_pt
                ),
            });
        }

        let raw = RawImage {
            pixels: RawImageData::U8(page.image.into_raw()),
            width: px_w as usize,
            height: px_h as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let id = self.doc.add_image(&raw);

        let ops = vec![Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(geometry.width_pt / px_w as f32),
                scale_y: Some(geometry.height_pt / px_h as f32),
                dpi: Some(PLACEMENT_DPI),
                rotate: None,
            },
        }];

        self.pages.push(PdfPage::new(
            pt_to_mm(geometry.width_pt),
            pt_to_mm(geometry.height_pt),
            ops,
        ));
        Ok(())
    }

    /// Serialise the document. Fails when no page was pushed.
    pub fn finish(self) -> Result<Vec<u8>, ItemError> {
        let Self { mut doc, pages } = self;
        if pages.is_empty() {
            return Err(ItemError::AssemblyFailed {
                detail: "document has no pages".into(),
            });
        }
        let count = pages.len();
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!("PDF writer reported {} warnings", warnings.len());
        }
        debug!("Assembled {} pages → {} bytes", count, bytes.len());
        Ok(bytes)
    }
}

/// Compose `pages` (already in document order) into a PDF titled `title`.
/// Each page's own geometry sets its size.
pub fn compose(title: &str, pages: Vec<InvertedPage>) -> Result<Vec<u8>, ItemError> {
    let mut assembler = DocumentAssembler::new(title);
    for page in pages {
        let geometry = page.geometry;
        assembler.push_page(page, geometry)?;
    }
    assembler.finish()
}
