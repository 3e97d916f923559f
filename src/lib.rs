//! # inksaver
//!
//! Turn dark-background PDFs and images into color-inverted copies that are
//! cheap to print.
//!
//! Slide decks and screenshots with white text on black burn through toner.
//! This crate rasterises every PDF page, inverts each pixel channel
//! (`255 - v`), and writes the pages back into a PDF with the original page
//! sizes. Images are inverted directly. A batch of mixed inputs keeps going
//! when one item fails and reports exactly what failed.
//!
//! ## Pipeline Overview
//!
//! ```text
//! (name, bytes)…
//!  │
//!  ├─ 1. Classify  PDF or image, by extension
//!  ├─ 2. Count     PDF pages, for progress units
//!  ├─ 3. Render    one page at a time via pdfium or poppler
//!  ├─ 4. Invert    normalise to RGB8, 255 - v per channel
//!  ├─ 5. Rebuild   pages → PDF at original size (printpdf), or encode images
//!  └─ 6. Deliver   one file as-is, several as a .tar.gz
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use inksaver::{deliver, process_batch, BatchConfig, BatchJob, Engine, Resolution};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Engine::detect();
//!     let config = BatchConfig::builder().resolution(Resolution::Fine).build()?;
//!     let job = BatchJob::new(config)
//!         .input("slides.pdf", std::fs::read("slides.pdf")?)
//!         .input("terminal.png", std::fs::read("terminal.png")?);
//!
//!     let output = process_batch(&engine, job)?;
//!     eprintln!("{}", output.summary());
//!
//!     let delivery = deliver(output, inksaver::DEFAULT_ARCHIVE_NAME)?;
//!     delivery.write_to(std::path::Path::new(delivery.filename()))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `inksaver` binary (clap + indicatif + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! inksaver = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDF Backends
//!
//! | Backend | Needs | Page size |
//! |---------|-------|-----------|
//! | pdfium  | `libpdfium` (see `PDFIUM_LIB_PATH`) | read from the document |
//! | poppler | `pdftoppm` + `pdfinfo` on `PATH`    | derived from the raster |
//!
//! With neither installed, images still work and PDFs are reported as failed.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod archive;
pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use archive::{deliver, pack, write_file, Delivery, ARCHIVE_MIME};
pub use batch::{process_batch, process_batch_async, BatchJob, Engine};
pub use config::{
    BatchConfig, BatchConfigBuilder, EncodedFormat, NamingSuffix, OutputFormat, PageNamingLayout,
    PdfOutput, Resolution, BASE_DPI, DEFAULT_ARCHIVE_NAME,
};
pub use error::{InksaverError, ItemError};
pub use output::{AssetKind, BatchOutput, BatchStats, InputAsset, ItemFailure, OutputArtifact};
pub use pipeline::backend::{
    detect_backends, select_backend, BackendKind, PageGeometry, PdfHandle, RasterPage,
    RenderBackend,
};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback, ProgressState};
