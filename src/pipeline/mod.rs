//! Pipeline stages for ink-saving conversion.
//!
//! Each submodule implements one transformation step and is testable on its
//! own. The batch orchestrator in [`crate::batch`] strings them together.
//!
//! ## Data Flow
//!
//! ```text
//!        ┌── PDF ──▶ render ──▶ invert ──▶ assemble ─┐
//! input ─┤          (backend)  (per page)  (printpdf)├─▶ naming ──▶ artifact
//!        └── image ───────────▶ invert ──▶ encode ───┘
//! ```
//!
//! 1. [`backend`]: probe and hold the PDF rendering capability
//! 2. [`render`]: rasterise a PDF page by page at the configured scale
//! 3. [`invert`]: normalise to 8-bit RGB and invert every channel
//! 4. [`assemble`]: write inverted pages back into a PDF at original size
//! 5. [`encode`]: encode inverted images as PNG, JPEG, BMP or TIFF
//! 6. [`naming`]: deterministic, collision-free output filenames

pub mod assemble;
pub mod backend;
pub mod encode;
pub mod invert;
pub mod naming;
pub mod pdfium;
pub mod poppler;
pub mod render;
