//! Configuration types for a batch run.
//!
//! All batch behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. Every user-facing choice is a closed enumeration
//! with an explicit effect table (`as_str`, `extension`, `scale_factor`, …),
//! so an invalid option cannot reach the pipeline.

use crate::error::InksaverError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rasterisation DPI that corresponds to a scale factor of 1.0.
pub const BASE_DPI: f32 = 150.0;

/// Default name of the archive produced when a batch yields several files.
pub const DEFAULT_ARCHIVE_NAME: &str = "inverted_files.tar.gz";

/// Configuration for one batch run.
///
/// Built via [`BatchConfig::builder()`] or using [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use inksaver::{BatchConfig, NamingSuffix, OutputFormat, Resolution};
///
/// let config = BatchConfig::builder()
///     .naming_suffix(NamingSuffix::InkSaver)
///     .output_format(OutputFormat::Jpg)
///     .resolution(Resolution::Print)
///     .build()
///     .unwrap();
/// assert_eq!(config.resolution.dpi(), 300);
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Suffix appended to every output base name. Default: `_inverted`.
    pub naming_suffix: NamingSuffix,

    /// Encoding for image outputs (and PDF pages in [`PdfOutput::PageImages`]
    /// mode). Default: PNG.
    pub output_format: OutputFormat,

    /// Rasterisation scale for PDF pages. Default: [`Resolution::Standard`].
    pub resolution: Resolution,

    /// Where the page number goes in per-page filenames. Default: `name_page_N`.
    pub page_layout: PageNamingLayout,

    /// Whether a PDF produces one reassembled PDF or one image per page.
    /// Default: [`PdfOutput::Document`].
    pub pdf_output: PdfOutput,

    /// JPEG quality (1–100) when encoding JPEG outputs. Default: 75.
    pub jpeg_quality: u8,

    /// Filename of the archive returned when more than one artifact exists.
    pub archive_name: String,

    /// Receives progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            naming_suffix: NamingSuffix::default(),
            output_format: OutputFormat::default(),
            resolution: Resolution::default(),
            page_layout: PageNamingLayout::default(),
            pdf_output: PdfOutput::default(),
            jpeg_quality: 75,
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("naming_suffix", &self.naming_suffix)
            .field("output_format", &self.output_format)
            .field("resolution", &self.resolution)
            .field("page_layout", &self.page_layout)
            .field("pdf_output", &self.pdf_output)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("archive_name", &self.archive_name)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn naming_suffix(mut self, suffix: NamingSuffix) -> Self {
        self.config.naming_suffix = suffix;
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.config.resolution = resolution;
        self
    }

    pub fn page_layout(mut self, layout: PageNamingLayout) -> Self {
        self.config.page_layout = layout;
        self
    }

    pub fn pdf_output(mut self, mode: PdfOutput) -> Self {
        self.config.pdf_output = mode;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    pub fn archive_name(mut self, name: impl Into<String>) -> Self {
        self.config.archive_name = name.into();
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, InksaverError> {
        let c = &self.config;
        if !(1..=100).contains(&c.jpeg_quality) {
            return Err(InksaverError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        if c.archive_name.trim().is_empty() {
            return Err(InksaverError::InvalidConfig(
                "Archive name must not be empty".into(),
            ));
        }
        if c.archive_name.contains(['/', '\\']) {
            return Err(InksaverError::InvalidConfig(format!(
                "Archive name must be a bare filename, got '{}'",
                c.archive_name
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Suffix appended to every output filename's base name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamingSuffix {
    /// `_inverted` (default)
    #[default]
    Inverted,
    /// `_ink_saver`
    InkSaver,
    /// `_print_ready`
    PrintReady,
}

impl NamingSuffix {
    pub fn as_str(self) -> &'static str {
        match self {
            NamingSuffix::Inverted => "_inverted",
            NamingSuffix::InkSaver => "_ink_saver",
            NamingSuffix::PrintReady => "_print_ready",
        }
    }
}

/// Output encoding for image-derived artifacts.
///
/// PDF inputs in [`PdfOutput::Document`] mode always produce PDF output and
/// ignore this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Lossless PNG. (default)
    #[default]
    Png,
    /// JPEG at [`BatchConfig::jpeg_quality`].
    Jpg,
    /// Re-encode in the source image's own format. PDF pages fall back to PNG.
    KeepOriginal,
}

impl OutputFormat {
    /// Resolve the concrete encoding and filename extension for an output
    /// whose source had extension `source_ext` (`None` for PDF pages).
    pub fn target(self, source_ext: Option<&str>) -> OutputTarget {
        match self {
            OutputFormat::Png => OutputTarget::new(EncodedFormat::Png, "png"),
            OutputFormat::Jpg => OutputTarget::new(EncodedFormat::Jpeg, "jpg"),
            OutputFormat::KeepOriginal => source_ext
                .map(|ext| ext.to_ascii_lowercase())
                .and_then(|ext| EncodedFormat::from_extension(&ext).map(|f| (f, ext)))
                .map(|(format, ext)| OutputTarget {
                    format,
                    extension: ext,
                })
                .unwrap_or_else(|| OutputTarget::new(EncodedFormat::Png, "png")),
        }
    }
}

/// A concrete raster encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodedFormat {
    Png,
    Jpeg,
    Bmp,
    Tiff,
}

impl EncodedFormat {
    /// Map a lowercase file extension to an encoding.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(EncodedFormat::Png),
            "jpg" | "jpeg" => Some(EncodedFormat::Jpeg),
            "bmp" => Some(EncodedFormat::Bmp),
            "tif" | "tiff" => Some(EncodedFormat::Tiff),
            _ => None,
        }
    }

    /// Content type for a single-file download.
    pub fn mime_type(self) -> &'static str {
        match self {
            EncodedFormat::Png => "image/png",
            EncodedFormat::Jpeg => "image/jpeg",
            EncodedFormat::Bmp => "image/bmp",
            EncodedFormat::Tiff => "image/tiff",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EncodedFormat::Png => "PNG",
            EncodedFormat::Jpeg => "JPEG",
            EncodedFormat::Bmp => "BMP",
            EncodedFormat::Tiff => "TIFF",
        }
    }
}

/// Encoding plus the extension written into the filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub format: EncodedFormat,
    pub extension: String,
}

impl OutputTarget {
    fn new(format: EncodedFormat, extension: &str) -> Self {
        Self {
            format,
            extension: extension.to_string(),
        }
    }
}

/// Rasterisation resolution for PDF pages.
///
/// | Setting | Scale | DPI |
/// |---------|-------|-----|
/// | `Standard` | 1.0× | 150 |
/// | `Fine`     | 1.5× | 225 |
/// | `Print`    | 2.0× | 300 |
///
/// The scale applies equally to width and height, so page aspect ratio is
/// preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    Standard,
    Fine,
    Print,
}

impl Resolution {
    pub fn scale_factor(self) -> f32 {
        match self {
            Resolution::Standard => 1.0,
            Resolution::Fine => 1.5,
            Resolution::Print => 2.0,
        }
    }

    pub fn dpi(self) -> u32 {
        (BASE_DPI * self.scale_factor()).round() as u32
    }

    /// Pixels per PDF point (1 pt = 1/72 inch) at this resolution.
    pub fn pixels_per_point(self) -> f32 {
        self.dpi() as f32 / 72.0
    }
}

/// Placement of the page number in per-page filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageNamingLayout {
    /// `slide_page_2_inverted.png` (default)
    #[default]
    NamePageN,
    /// `slide_p2_inverted.png`
    NamePN,
    /// `page_2_slide_inverted.png`
    PageNName,
}

impl PageNamingLayout {
    /// Base name for 1-indexed `page` of a document called `base`.
    pub fn apply(self, base: &str, page: usize) -> String {
        match self {
            PageNamingLayout::NamePageN => format!("{base}_page_{page}"),
            PageNamingLayout::NamePN => format!("{base}_p{page}"),
            PageNamingLayout::PageNName => format!("page_{page}_{base}"),
        }
    }
}

/// What a PDF input produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PdfOutput {
    /// One reassembled PDF with the original page sizes. (default)
    #[default]
    Document,
    /// One image per page, named with [`PageNamingLayout`].
    PageImages,
}
