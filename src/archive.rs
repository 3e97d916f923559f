//! Packaging and delivery of batch results.
//!
//! One artifact is delivered as-is. Several are bundled into a gzip-compressed
//! tar archive with one entry per artifact, in production order. Entry
//! headers carry fixed metadata (mode 0644, mtime 0), so the same artifacts
//! always pack to the same bytes.

use crate::config::DEFAULT_ARCHIVE_NAME;
use crate::error::InksaverError;
use crate::output::{BatchOutput, OutputArtifact};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::path::Path;
use tracing::{debug, info};

/// Content type of a packed archive.
pub const ARCHIVE_MIME: &str = "application/gzip";

/// Bundle `artifacts` into one `.tar.gz` byte stream.
pub fn pack(artifacts: &[OutputArtifact]) -> Result<Vec<u8>, InksaverError> {
    let packaging = |detail: String| InksaverError::Packaging {
        entries: artifacts.len(),
        detail,
    };

    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.mode(tar::HeaderMode::Deterministic);

    for artifact in artifacts {
        let mut header = tar::Header::new_gnu();
        header.set_size(artifact.bytes().len() as u64);
        header.set_mode(0o644);
        header.set_mtime(0);
        header.set_entry_type(tar::EntryType::Regular);
        builder
            .append_data(&mut header, artifact.filename(), artifact.bytes())
            .map_err(|e| packaging(format!("{}: {}", artifact.filename(), e)))?;
    }

    let bytes = builder
        .into_inner()
        .and_then(GzEncoder::finish)
        .map_err(|e| packaging(e.to_string()))?;

    debug!("Packed {} entries → {} bytes", artifacts.len(), bytes.len());
    Ok(bytes)
}

/// What a finished batch hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Exactly one artifact, with its own content type.
    Single(OutputArtifact),
    /// Several artifacts packed into one archive.
    Archive(OutputArtifact),
}

impl Delivery {
    pub fn artifact(&self) -> &OutputArtifact {
        match self {
            Delivery::Single(a) | Delivery::Archive(a) => a,
        }
    }

    pub fn filename(&self) -> &str {
        self.artifact().filename()
    }

    pub fn bytes(&self) -> &[u8] {
        self.artifact().bytes()
    }

    pub fn content_type(&self) -> &'static str {
        self.artifact().mime_hint()
    }

    pub fn is_archive(&self) -> bool {
        matches!(self, Delivery::Archive(_))
    }

    /// Write the delivered bytes to `path`.
    ///
    /// Uses atomic write (temp file + rename) so a failed write never leaves
    /// a truncated file behind.
    pub fn write_to(&self, path: &Path) -> Result<(), InksaverError> {
        write_file(path, self.bytes())?;
        info!("Wrote {} ({} bytes)", path.display(), self.bytes().len());
        Ok(())
    }
}

/// Turn a batch result into a single deliverable.
///
/// The archive is built only when more than one artifact exists; its name is
/// `archive_name` (see [`DEFAULT_ARCHIVE_NAME`]).
pub fn deliver(output: BatchOutput, archive_name: &str) -> Result<Delivery, InksaverError> {
    let mut artifacts = output.artifacts;
    match artifacts.len() {
        0 => Err(InksaverError::Packaging {
            entries: 0,
            detail: "there are no artifacts to deliver".into(),
        }),
        1 => Ok(Delivery::Single(artifacts.remove(0))),
        n => {
            let name = if archive_name.trim().is_empty() {
                DEFAULT_ARCHIVE_NAME
            } else {
                archive_name
            };
            let bytes = pack(&artifacts)?;
            info!("Packed {} artifacts into {}", n, name);
            Ok(Delivery::Archive(OutputArtifact::new(name, bytes, ARCHIVE_MIME)))
        }
    }
}

/// Write `bytes` to `path` through a sibling temp file, creating parent
/// directories as needed.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), InksaverError> {
    let write_err = |source: std::io::Error| InksaverError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    std::io::Write::write_all(&mut tmp, bytes).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
