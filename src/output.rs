//! Batch inputs and outputs: assets in, artifacts and failure records out.

use crate::error::{InksaverError, ItemError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Kind of an input, inferred from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    Pdf,
    Image,
}

impl AssetKind {
    /// Classify a lowercase extension; `None` for unsupported types.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(AssetKind::Pdf),
            "png" | "jpg" | "jpeg" | "bmp" | "tif" | "tiff" => Some(AssetKind::Image),
            _ => None,
        }
    }
}

/// One named input buffer. Immutable once ingested.
#[derive(Clone, PartialEq, Eq)]
pub struct InputAsset {
    name: String,
    bytes: Vec<u8>,
    kind: AssetKind,
    extension: String,
}

impl InputAsset {
    /// Ingest a `(name, bytes)` pair, classifying it by extension.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ItemError> {
        let name = name.into();
        let extension = Path::new(&name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let kind = AssetKind::from_extension(&extension).ok_or_else(|| {
            ItemError::UnsupportedInput {
                extension: extension.clone(),
            }
        })?;
        Ok(Self {
            name,
            bytes,
            kind,
            extension,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Lowercase extension without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// File stem with any directory components removed.
    pub fn base_name(&self) -> String {
        Path::new(&self.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}

impl std::fmt::Debug for InputAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputAsset")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// A finished output file. The bytes never change after creation.
#[derive(Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    filename: String,
    bytes: Vec<u8>,
    mime_hint: &'static str,
}

impl OutputArtifact {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>, mime_hint: &'static str) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            mime_hint,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Content type for a download of this file.
    pub fn mime_hint(&self) -> &'static str {
        self.mime_hint
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl std::fmt::Debug for OutputArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputArtifact")
            .field("filename", &self.filename)
            .field("mime_hint", &self.mime_hint)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// A recorded per-item failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    /// Input name as supplied by the caller.
    pub input: String,
    /// 1-indexed PDF page, when the failure is tied to one page.
    pub page: Option<usize>,
    pub error: ItemError,
}

impl ItemFailure {
    /// `slide.pdf (page 2)` or `photo.png`.
    pub fn label(&self) -> String {
        match self.page {
            Some(page) => format!("{} (page {})", self.input, page),
            None => self.input.clone(),
        }
    }
}

/// Counters and timings for a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Inputs supplied to the batch, including unsupported ones.
    pub total_inputs: usize,
    /// Artifacts produced.
    pub artifacts: usize,
    /// Failure records.
    pub failures: usize,
    /// Units precomputed before processing.
    pub units_total: usize,
    /// Units attempted, successful or not.
    pub units_completed: usize,
    /// Name of the backend used for PDFs, if any.
    pub backend: Option<String>,
    pub duration_ms: u64,
}

/// Everything a batch produced.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Artifacts in production order; filenames are unique.
    pub artifacts: Vec<OutputArtifact>,
    pub failures: Vec<ItemFailure>,
    pub stats: BatchStats,
}

impl BatchOutput {
    /// Look up an artifact by filename.
    pub fn get(&self, filename: &str) -> Option<&OutputArtifact> {
        self.artifacts.iter().find(|a| a.filename() == filename)
    }

    pub fn filenames(&self) -> Vec<&str> {
        self.artifacts.iter().map(OutputArtifact::filename).collect()
    }

    /// True when some artifacts exist and some items failed.
    pub fn is_partial(&self) -> bool {
        !self.artifacts.is_empty() && !self.failures.is_empty()
    }

    /// One-line outcome for humans: distinguishes full and partial success.
    pub fn summary(&self) -> String {
        if self.failures.is_empty() {
            format!("{} files processed successfully", self.artifacts.len())
        } else {
            format!(
                "{} files processed, {} failed",
                self.artifacts.len(),
                self.failures.len()
            )
        }
    }

    /// Treat any recorded failure as an error.
    pub fn into_result(self) -> Result<Self, InksaverError> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(InksaverError::PartialFailure {
                succeeded: self.artifacts.len(),
                failed: self.failures.len(),
                total: self.artifacts.len() + self.failures.len(),
            })
        }
    }
}
