//! Batch orchestration: mixed PDF and image inputs → named artifacts.
//!
//! The loop is strictly sequential. PDFs go first, then images; each unit
//! (one page or one image) runs to completion and reports progress before
//! the next one starts. A failing item is recorded in
//! [`BatchOutput::failures`] and the loop moves on; only an empty batch or a
//! batch where nothing succeeded returns `Err`.

use crate::config::{BatchConfig, PdfOutput};
use crate::error::{InksaverError, ItemError};
use crate::output::{AssetKind, BatchOutput, BatchStats, InputAsset, ItemFailure, OutputArtifact};
use crate::pipeline::assemble::DocumentAssembler;
use crate::pipeline::backend::{self, BackendKind, RenderBackend};
use crate::pipeline::naming::{self, UniqueNames};
use crate::pipeline::{encode, invert, render};
use crate::progress::{ProgressCallback, ProgressState};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The PDF rendering capability a batch runs with.
///
/// Resolved once (usually with [`Engine::detect`]) and passed by reference
/// into every batch; nothing about it changes afterwards.
#[derive(Clone, Default)]
pub struct Engine {
    backend: Option<Arc<dyn RenderBackend>>,
}

impl Engine {
    /// Probe capabilities in priority order and keep the first that works.
    pub fn detect() -> Self {
        Self {
            backend: backend::select_backend(),
        }
    }

    /// Use exactly `backend`.
    pub fn with_backend(backend: Arc<dyn RenderBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// An engine that rejects every PDF with
    /// [`ItemError::BackendUnavailable`] but still processes images.
    pub fn without_backend() -> Self {
        Self { backend: None }
    }

    /// Bring up one specific capability, failing if it is not present.
    pub fn from_kind(kind: BackendKind) -> Result<Self, InksaverError> {
        match kind.probe() {
            Ok(backend) => {
                info!("PDF backend: {}", backend.name());
                Ok(Self::with_backend(backend))
            }
            Err(reason) => {
                debug!("Backend {} unavailable: {}", kind, reason);
                Err(InksaverError::BackendNotDetected(kind.name().to_string()))
            }
        }
    }

    pub fn backend(&self) -> Option<&dyn RenderBackend> {
        self.backend.as_deref()
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.name())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("backend", &self.backend_name())
            .finish()
    }
}

/// One run: ordered `(name, bytes)` inputs plus configuration.
#[derive(Clone, Default)]
pub struct BatchJob {
    pub inputs: Vec<(String, Vec<u8>)>,
    pub config: BatchConfig,
}

impl BatchJob {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            inputs: Vec::new(),
            config,
        }
    }

    /// Append an input; order is preserved.
    pub fn input(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.inputs.push((name.into(), bytes));
        self
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

impl fmt::Debug for BatchJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.inputs.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("BatchJob")
            .field("inputs", &names)
            .field("config", &self.config)
            .finish()
    }
}

/// Process every input of `job` with `engine`'s backend.
///
/// # Returns
/// `Ok(BatchOutput)` when at least one artifact was produced, even if other
/// items failed (check `output.failures`).
///
/// # Errors
/// - [`InksaverError::EmptyBatch`] when `job` has no inputs
/// - [`InksaverError::NothingSucceeded`] when every input failed
pub fn process_batch(engine: &Engine, job: BatchJob) -> Result<BatchOutput, InksaverError> {
    let start = Instant::now();
    let BatchJob { inputs, config } = job;
    if inputs.is_empty() {
        return Err(InksaverError::EmptyBatch);
    }
    let total_inputs = inputs.len();
    let backend = engine.backend();
    info!(
        "Starting batch: {} inputs, backend {}",
        total_inputs,
        engine.backend_name().unwrap_or("none")
    );

    let mut run = Run::new(&config);

    // ── Step 1: Classify ─────────────────────────────────────────────────
    let mut pdfs = Vec::new();
    let mut images = Vec::new();
    for (name, bytes) in inputs {
        match InputAsset::new(name.as_str(), bytes) {
            Ok(asset) => match asset.kind() {
                AssetKind::Pdf => pdfs.push(asset),
                AssetKind::Image => images.push(asset),
            },
            Err(e) => run.fail(name, None, e),
        }
    }

    // ── Step 2: Precompute units ─────────────────────────────────────────
    let pdf_units: Vec<usize> = pdfs
        .iter()
        .map(|asset| match render::page_count(backend, asset.bytes()) {
            Ok(n) => n,
            Err(e) => {
                debug!("{}: page count unavailable ({}), counting 0 units", asset.name(), e);
                0
            }
        })
        .collect();
    run.total_units = images.len() + pdf_units.iter().sum::<usize>();
    debug!(
        "{} PDFs, {} images, {} units",
        pdfs.len(),
        images.len(),
        run.total_units
    );
    if let Some(ref cb) = run.callback {
        cb.on_batch_start(run.total_units);
    }

    // ── Step 3: PDFs, then images ────────────────────────────────────────
    for (asset, units) in pdfs.into_iter().zip(pdf_units) {
        match config.pdf_output {
            PdfOutput::Document => run.pdf_document(backend, asset, units),
            PdfOutput::PageImages => run.pdf_pages(backend, asset, units),
        }
    }
    for asset in images {
        run.image(asset);
    }

    // ── Step 4: Outcome ──────────────────────────────────────────────────
    let Run {
        total_units,
        completed_units,
        artifacts,
        failures,
        callback,
        ..
    } = run;

    if let Some(ref cb) = callback {
        cb.on_batch_complete(artifacts.len(), failures.len());
    }

    if artifacts.is_empty() {
        let first_error = failures
            .first()
            .map(|f| format!("{}: {}", f.label(), f.error))
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(InksaverError::NothingSucceeded {
            failed: total_inputs,
            total: total_inputs,
            first_error,
        });
    }

    let stats = BatchStats {
        total_inputs,
        artifacts: artifacts.len(),
        failures: failures.len(),
        units_total: total_units,
        units_completed: completed_units,
        backend: engine.backend_name().map(str::to_string),
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Batch complete: {} artifacts, {} failures, {}ms",
        stats.artifacts, stats.failures, stats.duration_ms
    );

    Ok(BatchOutput {
        artifacts,
        failures,
        stats,
    })
}

/// Run [`process_batch`] on Tokio's blocking pool.
///
/// PDF backends wrap blocking native code, so the loop must not run on an
/// async worker thread.
pub async fn process_batch_async(engine: Engine, job: BatchJob) -> Result<BatchOutput, InksaverError> {
    tokio::task::spawn_blocking(move || process_batch(&engine, job))
        .await
        .map_err(|e| InksaverError::Internal(format!("Batch task panicked: {}", e)))?
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Mutable state of one batch run.
struct Run<'c> {
    config: &'c BatchConfig,
    callback: Option<ProgressCallback>,
    total_units: usize,
    completed_units: usize,
    names: UniqueNames,
    artifacts: Vec<OutputArtifact>,
    failures: Vec<ItemFailure>,
}

/// A document that opens but has no pages is recorded as undecodable.
fn require_pages(count: usize) -> Result<usize, ItemError> {
    if count == 0 {
        Err(ItemError::Decode {
            detail: "document has no pages".into(),
        })
    } else {
        Ok(count)
    }
}

impl<'c> Run<'c> {
    fn new(config: &'c BatchConfig) -> Self {
        Self {
            config,
            callback: config.progress_callback.clone(),
            total_units: 0,
            completed_units: 0,
            names: UniqueNames::new(),
            artifacts: Vec::new(),
            failures: Vec::new(),
        }
    }

    fn advance(&mut self, units: usize, label: String) {
        self.completed_units += units;
        if let Some(ref cb) = self.callback {
            cb.on_unit_complete(&ProgressState {
                completed_units: self.completed_units,
                total_units: self.total_units,
                current_label: label,
            });
        }
    }

    fn emit(&mut self, filename: String, bytes: Vec<u8>, mime_hint: &'static str) {
        let filename = self.names.claim(filename);
        debug!("Produced {} ({} bytes)", filename, bytes.len());
        self.artifacts
            .push(OutputArtifact::new(filename, bytes, mime_hint));
    }

    fn fail(&mut self, input: String, page: Option<usize>, error: ItemError) {
        let failure = ItemFailure { input, page, error };
        warn!("{} failed: {}", failure.label(), failure.error);
        if let Some(ref cb) = self.callback {
            cb.on_item_error(&failure.label(), &failure.error.to_string());
        }
        self.failures.push(failure);
    }

    /// One PDF → one reassembled PDF. Every page is attempted; any page
    /// failure discards the partial document.
    fn pdf_document(&mut self, backend: Option<&dyn RenderBackend>, asset: InputAsset, units: usize) {
        let base = asset.base_name();
        let title = naming::document_title(&base, self.config.naming_suffix);
        let filename = naming::document_filename(&base, self.config.naming_suffix);
        let scale = self.config.resolution.scale_factor();

        let mut assembler = DocumentAssembler::new(&title);
        let mut first_failure: Option<(usize, ItemError)> = None;

        let opened = render::for_each_page(backend, asset.bytes(), scale, |index, total, result| {
            let page = index + 1;
            if first_failure.is_none() {
                let pushed = result.and_then(invert::invert_page).and_then(|inverted| {
                    let geometry = inverted.geometry;
                    assembler.push_page(inverted, geometry)
                });
                if let Err(e) = pushed {
                    first_failure = Some((page, e));
                }
            }
            self.advance(1, format!("{} (page {}/{})", asset.name(), page, total));
        });

        match (opened.and_then(require_pages), first_failure) {
            (Err(e), _) => {
                self.fail(asset.name().to_string(), None, e);
                self.advance(units, asset.name().to_string());
            }
            (Ok(_), Some((page, e))) => {
                debug!("{}: discarding {} assembled pages", asset.name(), assembler.len());
                self.fail(asset.name().to_string(), Some(page), e);
            }
            (Ok(_), None) => match assembler.finish() {
                Ok(bytes) => self.emit(filename, bytes, "application/pdf"),
                Err(e) => self.fail(asset.name().to_string(), None, e),
            },
        }
    }

    /// One PDF → one image per page. Page failures are isolated.
    fn pdf_pages(&mut self, backend: Option<&dyn RenderBackend>, asset: InputAsset, units: usize) {
        let base = asset.base_name();
        let cfg = self.config;
        let target = cfg.output_format.target(None);
        let scale = cfg.resolution.scale_factor();

        let opened = render::for_each_page(backend, asset.bytes(), scale, |index, total, result| {
            let page = index + 1;
            let encoded = result
                .and_then(invert::invert_page)
                .and_then(|inverted| encode::encode_image(&inverted.image, target.format, cfg.jpeg_quality));
            match encoded {
                Ok(bytes) => {
                    let filename = naming::page_filename(
                        &base,
                        page,
                        cfg.page_layout,
                        cfg.naming_suffix,
                        &target.extension,
                    );
                    self.emit(filename, bytes, target.format.mime_type());
                }
                Err(e) => self.fail(asset.name().to_string(), Some(page), e),
            }
            self.advance(1, format!("{} (page {}/{})", asset.name(), page, total));
        });

        if let Err(e) = opened.and_then(require_pages) {
            self.fail(asset.name().to_string(), None, e);
            self.advance(units, asset.name().to_string());
        }
    }

    fn image(&mut self, asset: InputAsset) {
        let cfg = self.config;
        let target = cfg.output_format.target(Some(asset.extension()));
        let encoded = invert::decode_image(asset.bytes())
            .and_then(invert::invert)
            .and_then(|rgb| encode::encode_image(&rgb, target.format, cfg.jpeg_quality));

        match encoded {
            Ok(bytes) => {
                let filename =
                    naming::image_filename(&asset.base_name(), cfg.naming_suffix, &target.extension);
                self.emit(filename, bytes, target.format.mime_type());
            }
            Err(e) => self.fail(asset.name().to_string(), None, e),
        }
        self.advance(1, asset.name().to_string());
    }
}
