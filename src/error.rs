//! Error types for the inksaver library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`InksaverError`] is **fatal**: the batch cannot deliver anything
//!   (no inputs, every item failed, the archive could not be built). Returned
//!   as `Err(InksaverError)` from the top-level batch functions.
//!
//! * [`ItemError`] is **non-fatal**: one input (or one PDF page) failed but the
//!   rest of the batch is fine. Stored inside [`crate::output::ItemFailure`]
//!   so callers can report partial success instead of losing the whole batch
//!   to one bad file.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the inksaver library.
///
/// Item-level failures use [`ItemError`] and are recorded in
/// [`crate::output::BatchOutput::failures`] rather than propagated here.
#[derive(Debug, Error)]
pub enum InksaverError {
    /// The batch contained no inputs at all.
    #[error("Nothing to process: the batch has no inputs")]
    EmptyBatch,

    /// Every input failed; there is nothing to deliver.
    #[error("No items succeeded: all {failed} of {total} inputs failed.\nFirst error: {first_error}")]
    NothingSucceeded {
        failed: usize,
        total: usize,
        first_error: String,
    },

    /// Some items succeeded but at least one failed.
    ///
    /// Returned by [`crate::output::BatchOutput::into_result`] when the
    /// caller wants to treat any item failure as an error.
    #[error("{failed}/{total} inputs failed during processing")]
    PartialFailure {
        succeeded: usize,
        failed: usize,
        total: usize,
    },

    /// The archive bundling several artifacts could not be built.
    #[error("Failed to package {entries} files into an archive: {detail}")]
    Packaging { entries: usize, detail: String },

    /// Could not bind to a pdfium library when one was explicitly requested.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium, or install PDFium where the system\n\
loader can find it. Images are still processed without a PDF backend.\n"
    )]
    PdfiumBindingFailed(String),

    /// A requested backend is not present on this machine.
    #[error("PDF backend '{0}' is not available on this machine")]
    BackendNotDetected(String),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single input or PDF page.
///
/// The batch continues unless every input fails.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum ItemError {
    /// No PDF rendering backend is available in this process.
    #[error("no PDF rendering backend is available")]
    BackendUnavailable,

    /// The bytes do not parse as their declared kind.
    #[error("could not decode input: {detail}")]
    Decode { detail: String },

    /// The image cannot be normalised to 8-bit RGB.
    #[error("unsupported color format: {detail}")]
    UnsupportedFormat { detail: String },

    /// The file extension is not one of the supported input kinds.
    #[error("unsupported input type '{extension}' (expected pdf, png, jpg, jpeg, bmp, tiff)")]
    UnsupportedInput { extension: String },

    /// The backend opened the document but failed on one page.
    #[error("page {page}: rasterisation failed: {detail}")]
    RasterizationFailed { page: usize, detail: String },

    /// The inverted raster could not be encoded into the output format.
    #[error("encoding as {format} failed: {detail}")]
    EncodeFailed { format: String, detail: String },

    /// The inverted pages could not be written back into a PDF.
    #[error("document reassembly failed: {detail}")]
    AssemblyFailed { detail: String },
}

impl ItemError {
    /// Short machine-friendly tag, used in JSON reports and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ItemError::BackendUnavailable => "backend_unavailable",
            ItemError::Decode { .. } => "decode_error",
            ItemError::UnsupportedFormat { .. } => "unsupported_format",
            ItemError::UnsupportedInput { .. } => "unsupported_input",
            ItemError::RasterizationFailed { .. } => "rasterization_failed",
            ItemError::EncodeFailed { .. } => "encode_failed",
            ItemError::AssemblyFailed { .. } => "assembly_failed",
        }
    }
}
