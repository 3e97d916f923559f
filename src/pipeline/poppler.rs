//! Poppler backend: shells out to `pdfinfo` and `pdftoppm`.
//!
//! This backend only rasterises. Page geometry is recovered from the raster
//! size and the DPI it was rendered at, which is exact up to pdftoppm's
//! rounding to whole pixels.
//!
//! The tools need a file path, so each opened document is copied into a
//! `TempDir` owned by the handle; dropping the handle deletes it.

use crate::config::BASE_DPI;
use crate::error::ItemError;
use crate::pipeline::backend::{PageGeometry, PdfHandle, RasterPage, RenderBackend};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::debug;

static RE_PAGES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^Pages:\s+(\d+)\s*$").unwrap());

/// Renders PDFs with the poppler-utils command-line tools.
#[derive(Debug, Clone)]
pub struct PopplerBackend {
    pdfinfo: PathBuf,
    pdftoppm: PathBuf,
}

impl PopplerBackend {
    /// Succeeds when both tools can be spawned from `PATH`.
    pub fn probe() -> Result<Self, String> {
        let backend = Self {
            pdfinfo: PathBuf::from("pdfinfo"),
            pdftoppm: PathBuf::from("pdftoppm"),
        };
        for tool in [&backend.pdfinfo, &backend.pdftoppm] {
            // poppler prints its version to stderr and some releases exit
            // non-zero for -v, so only a spawn failure counts as missing.
            Command::new(tool)
                .arg("-v")
                .output()
                .map_err(|e| format!("{}: {}", tool.display(), e))?;
        }
        Ok(backend)
    }
}

impl RenderBackend for PopplerBackend {
    fn name(&self) -> &str {
        "poppler"
    }

    fn reports_native_geometry(&self) -> bool {
        false
    }

    fn open<'a>(&'a self, pdf_bytes: &'a [u8]) -> Result<Box<dyn PdfHandle + 'a>, ItemError> {
        if !pdf_bytes.starts_with(b"%PDF") {
            return Err(ItemError::Decode {
                detail: "missing %PDF header".into(),
            });
        }

        let dir = TempDir::new().map_err(|e| ItemError::Decode {
            detail: format!("tempdir: {e}"),
        })?;
        let path = dir.path().join("input.pdf");
        std::fs::write(&path, pdf_bytes).map_err(|e| ItemError::Decode {
            detail: format!("tempfile write: {e}"),
        })?;

        let output = Command::new(&self.pdfinfo)
            .arg(&path)
            .output()
            .map_err(|e| ItemError::Decode {
                detail: format!("failed to run pdfinfo: {e}"),
            })?;
        if !output.status.success() {
            return Err(ItemError::Decode {
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let page_count = parse_page_count(&String::from_utf8_lossy(&output.stdout)).ok_or_else(
            || ItemError::Decode {
                detail: "pdfinfo reported no page count".into(),
            },
        )?;

        debug!("poppler: document opened, {} pages", page_count);
        Ok(Box::new(PopplerDocument {
            backend: self,
            dir,
            path,
            page_count,
        }))
    }
}

struct PopplerDocument<'a> {
    backend: &'a PopplerBackend,
    dir: TempDir,
    path: PathBuf,
    page_count: usize,
}

impl PdfHandle for PopplerDocument<'_> {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn rasterize_page(&mut self, index: usize, scale: f32) -> Result<RasterPage, ItemError> {
        let page = index + 1;
        let fail = |detail: String| ItemError::RasterizationFailed { page, detail };

        if index >= self.page_count {
            return Err(fail(format!(
                "out of range (document has {} pages)",
                self.page_count
            )));
        }

        let dpi = BASE_DPI * scale;
        let root = self.dir.path().join(format!("page-{page}"));
        let output = Command::new(&self.backend.pdftoppm)
            .args(["-f", &page.to_string(), "-l", &page.to_string()])
            .args(["-r", &format!("{dpi}")])
            .args(["-png", "-singlefile"])
            .arg(&self.path)
            .arg(&root)
            .output()
            .map_err(|e| fail(format!("failed to run pdftoppm: {e}")))?;
        if !output.status.success() {
            return Err(fail(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let png_path = root.with_extension("png");
        let image = load_and_remove(&png_path).map_err(fail)?;
        let geometry = PageGeometry::from_raster(image.width(), image.height(), dpi);
        debug!(
            "poppler: rendered page {} → {}x{} px",
            page,
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

fn load_and_remove(path: &Path) -> Result<image::DynamicImage, String> {
    let bytes = std::fs::read(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    // Keep at most one page on disk.
    let _ = std::fs::remove_file(path);
    image::load_from_memory(&bytes).map_err(|e| format!("decoding pdftoppm output: {e}"))
}

/// Extract `Pages:` from pdfinfo's report.
fn parse_page_count(report: &str) -> Option<usize> {
    RE_PAGES
        .captures(report)
        .and_then(|caps| caps[1].parse().ok())
}
