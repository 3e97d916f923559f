//! Integration tests for batch processing.
//!
//! PDFs are simulated by an in-memory backend that understands byte strings
//! like `FAKEPDF:3` (three pages) or `FAKEPDF:3:fail=2:nocount`, so these
//! tests need neither libpdfium nor poppler. Images are real PNG/JPEG/BMP
//! bytes produced with the `image` crate.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use inksaver::{
    deliver, process_batch, process_batch_async, BatchConfig, BatchJob, BatchProgressCallback,
    Delivery, Engine, InksaverError, ItemError, NamingSuffix, OutputFormat, PageGeometry,
    PageNamingLayout, PdfHandle, PdfOutput, ProgressState, RasterPage, RenderBackend, BASE_DPI,
};
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Fake PDF backend ─────────────────────────────────────────────────────────

/// Page size of every fake page, in points.
const PAGE_PT: (f32, f32) = (36.0, 48.0);
/// Gray level of every fake page before inversion.
const DARK: u8 = 20;

#[derive(Debug, Clone, Copy)]
struct FakeScript {
    pages: usize,
    fail_page: Option<usize>,
    count_fails: bool,
}

fn parse_fake(bytes: &[u8]) -> Result<FakeScript, ItemError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ItemError::Decode {
        detail: "not a fake pdf".into(),
    })?;
    let mut parts = text.split(':');
    if parts.next() != Some("FAKEPDF") {
        return Err(ItemError::Decode {
            detail: "missing FAKEPDF header".into(),
        });
    }
    let pages = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(|| ItemError::Decode {
            detail: "bad page count".into(),
        })?;
    let mut script = FakeScript {
        pages,
        fail_page: None,
        count_fails: false,
    };
    for flag in parts {
        if flag == "nocount" {
            script.count_fails = true;
        } else if let Some(n) = flag.strip_prefix("fail=") {
            script.fail_page = n.parse().ok();
        }
    }
    Ok(script)
}

#[derive(Default)]
struct FakeBackend {
    open_handles: Arc<AtomicUsize>,
    opened: AtomicUsize,
}

impl RenderBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn reports_native_geometry(&self) -> bool {
        true
    }

    fn open<'a>(&'a self, pdf_bytes: &'a [u8]) -> Result<Box<dyn PdfHandle + 'a>, ItemError> {
        let script = parse_fake(pdf_bytes)?;
        self.open_handles.fetch_add(1, Ordering::SeqCst);
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeDocument {
            script,
            open_handles: Arc::clone(&self.open_handles),
        }))
    }

    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ItemError> {
        let script = parse_fake(pdf_bytes)?;
        if script.count_fails {
            return Err(ItemError::Decode {
                detail: "page tree unreadable".into(),
            });
        }
        Ok(script.pages)
    }
}

struct FakeDocument {
    script: FakeScript,
    open_handles: Arc<AtomicUsize>,
}

impl PdfHandle for FakeDocument {
    fn page_count(&self) -> usize {
        self.script.pages
    }

    fn rasterize_page(&mut self, index: usize, scale: f32) -> Result<RasterPage, ItemError> {
        if self.script.fail_page == Some(index + 1) {
            return Err(ItemError::RasterizationFailed {
                page: index + 1,
                detail: "simulated".into(),
            });
        }
        let px_per_pt = BASE_DPI * scale / 72.0;
        let w = (PAGE_PT.0 * px_per_pt).round() as u32;
        let h = (PAGE_PT.1 * px_per_pt).round() as u32;
        Ok(RasterPage {
            page_index: index,
            image: DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([DARK, DARK, DARK]))),
            scale,
            geometry: PageGeometry {
                width_pt: PAGE_PT.0,
                height_pt: PAGE_PT.1,
            },
        })
    }
}

impl Drop for FakeDocument {
    fn drop(&mut self) {
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

// ── Test helpers ─────────────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fake_engine() -> (Engine, Arc<FakeBackend>) {
    init_tracing();
    let backend = Arc::new(FakeBackend::default());
    (Engine::with_backend(backend.clone()), backend)
}

fn encoded(format: ImageFormat, color: [u8; 3]) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb(color)));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

fn png(color: [u8; 3]) -> Vec<u8> {
    encoded(ImageFormat::Png, color)
}

fn config() -> BatchConfig {
    BatchConfig::default()
}

fn page_images_config() -> BatchConfig {
    BatchConfig::builder()
        .pdf_output(PdfOutput::PageImages)
        .build()
        .unwrap()
}

#[derive(Default)]
struct Recorder {
    start: Mutex<Option<usize>>,
    states: Mutex<Vec<ProgressState>>,
    errors: Mutex<Vec<String>>,
    complete: Mutex<Option<(usize, usize)>>,
}

impl BatchProgressCallback for Recorder {
    fn on_batch_start(&self, total_units: usize) {
        *self.start.lock().unwrap() = Some(total_units);
    }

    fn on_unit_complete(&self, state: &ProgressState) {
        self.states.lock().unwrap().push(state.clone());
    }

    fn on_item_error(&self, label: &str, _error: &str) {
        self.errors.lock().unwrap().push(label.to_string());
    }

    fn on_batch_complete(&self, artifacts: usize, failures: usize) {
        *self.complete.lock().unwrap() = Some((artifacts, failures));
    }
}

fn unpack(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(bytes));
    archive
        .entries()
        .unwrap()
        .map(|entry| {
            let mut entry = entry.unwrap();
            let name = entry.path().unwrap().to_string_lossy().into_owned();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            (name, data)
        })
        .collect()
}

// ── Images ───────────────────────────────────────────────────────────────────

#[test]
fn test_all_valid_images_yield_one_artifact_each() {
    let job = BatchJob::new(config())
        .input("a.png", png([0, 0, 0]))
        .input("b.png", png([30, 30, 30]))
        .input("c.png", png([255, 0, 128]));

    let output = process_batch(&Engine::without_backend(), job).unwrap();
    assert_eq!(output.artifacts.len(), 3);
    assert!(output.failures.is_empty());
    assert_eq!(
        output.filenames(),
        ["a_inverted.png", "b_inverted.png", "c_inverted.png"]
    );
    assert_eq!(output.stats.units_total, 3);
    assert_eq!(output.stats.units_completed, 3);
    assert_eq!(output.summary(), "3 files processed successfully");

    let c = image::load_from_memory(output.get("c_inverted.png").unwrap().bytes())
        .unwrap()
        .to_rgb8();
    assert_eq!(c.get_pixel(0, 0), &Rgb([0, 255, 127]));
}

#[test]
fn test_one_corrupt_item_does_not_affect_others() {
    let job = BatchJob::new(config())
        .input("first.png", png([10, 10, 10]))
        .input("broken.png", b"\x89PNG but not really".to_vec())
        .input("last.png", png([20, 20, 20]));

    let output = process_batch(&Engine::without_backend(), job).unwrap();
    assert_eq!(output.filenames(), ["first_inverted.png", "last_inverted.png"]);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].input, "broken.png");
    assert_eq!(output.failures[0].error.kind(), "decode_error");
    assert!(output.is_partial());
    assert_eq!(output.summary(), "2 files processed, 1 failed");
    assert_eq!(output.stats.units_completed, 3);
}

#[test]
fn test_undecodable_container_is_unsupported_format() {
    // AVIF is recognised by its `ftyp` box, but no AVIF decoder is built in.
    let avif = b"\0\0\0\x1cftypavif\0\0\0\0avifmif1miaf".to_vec();
    let job = BatchJob::new(config())
        .input("photo.png", avif)
        .input("ok.png", png([5, 5, 5]));

    let output = process_batch(&Engine::without_backend(), job).unwrap();
    assert_eq!(output.filenames(), ["ok_inverted.png"]);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].input, "photo.png");
    assert!(
        matches!(output.failures[0].error, ItemError::UnsupportedFormat { .. }),
        "got {:?}",
        output.failures[0].error
    );
    assert_eq!(output.failures[0].error.kind(), "unsupported_format");
}

#[test]
fn test_output_formats() {
    let cfg = BatchConfig::builder()
        .output_format(OutputFormat::Jpg)
        .naming_suffix(NamingSuffix::PrintReady)
        .jpeg_quality(90)
        .build()
        .unwrap();
    let job = BatchJob::new(cfg).input("shot.bmp", encoded(ImageFormat::Bmp, [0, 0, 0]));
    let output = process_batch(&Engine::without_backend(), job).unwrap();
    let artifact = &output.artifacts[0];
    assert_eq!(artifact.filename(), "shot_print_ready.jpg");
    assert_eq!(artifact.mime_hint(), "image/jpeg");
    assert!(artifact.bytes().starts_with(&[0xFF, 0xD8]));

    let keep = BatchConfig::builder()
        .output_format(OutputFormat::KeepOriginal)
        .build()
        .unwrap();
    let job = BatchJob::new(keep)
        .input("shot.bmp", encoded(ImageFormat::Bmp, [0, 0, 0]))
        .input("photo.JPG", encoded(ImageFormat::Jpeg, [0, 0, 0]));
    let output = process_batch(&Engine::without_backend(), job).unwrap();
    assert_eq!(output.filenames(), ["shot_inverted.bmp", "photo_inverted.jpg"]);
    assert_eq!(output.artifacts[0].mime_hint(), "image/bmp");
}

// ── PDFs ─────────────────────────────────────────────────────────────────────

#[test]
fn test_slide_pdf_page_images_naming() {
    let (engine, _) = fake_engine();
    let job = BatchJob::new(page_images_config()).input("slide.pdf", b"FAKEPDF:3".to_vec());

    let output = process_batch(&engine, job).unwrap();
    assert_eq!(
        output.filenames(),
        [
            "slide_page_1_inverted.png",
            "slide_page_2_inverted.png",
            "slide_page_3_inverted.png"
        ]
    );

    let page = image::load_from_memory(output.artifacts[1].bytes())
        .unwrap()
        .to_rgb8();
    assert_eq!(page.dimensions(), (75, 100));
    assert_eq!(page.get_pixel(10, 10), &Rgb([255 - DARK; 3]));
}

#[test]
fn test_page_layouts_and_resolution() {
    let (engine, _) = fake_engine();
    let cfg = BatchConfig::builder()
        .pdf_output(PdfOutput::PageImages)
        .page_layout(PageNamingLayout::PageNName)
        .resolution(inksaver::Resolution::Print)
        .build()
        .unwrap();
    let job = BatchJob::new(cfg).input("deck.pdf", b"FAKEPDF:2".to_vec());

    let output = process_batch(&engine, job).unwrap();
    assert_eq!(
        output.filenames(),
        ["page_1_deck_inverted.png", "page_2_deck_inverted.png"]
    );
    let page = image::load_from_memory(output.artifacts[0].bytes()).unwrap();
    // 2x scale doubles both dimensions.
    assert_eq!((page.width(), page.height()), (150, 200));
}

#[test]
fn test_document_mode_reassembles_pdf() {
    let (engine, _) = fake_engine();
    let job = BatchJob::new(config()).input("deck.pdf", b"FAKEPDF:4".to_vec());

    let output = process_batch(&engine, job).unwrap();
    assert_eq!(output.filenames(), ["deck_inverted.pdf"]);
    let artifact = &output.artifacts[0];
    assert_eq!(artifact.mime_hint(), "application/pdf");

    let doc = lopdf::Document::load_mem(artifact.bytes()).expect("valid PDF");
    assert_eq!(doc.get_pages().len(), 4);
    assert_eq!(output.stats.units_total, 4);
    assert_eq!(output.stats.backend.as_deref(), Some("fake"));
}

#[test]
fn test_document_page_failure_discards_document() {
    let (engine, _) = fake_engine();
    let recorder = Arc::new(Recorder::default());
    let cfg = BatchConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();
    let job = BatchJob::new(cfg)
        .input("deck.pdf", b"FAKEPDF:3:fail=2".to_vec())
        .input("ok.png", png([0, 0, 0]));

    let output = process_batch(&engine, job).unwrap();
    assert_eq!(output.filenames(), ["ok_inverted.png"]);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].input, "deck.pdf");
    assert_eq!(output.failures[0].page, Some(2));

    // Every page is still attempted.
    assert_eq!(output.stats.units_total, 4);
    assert_eq!(output.stats.units_completed, 4);
    assert_eq!(recorder.states.lock().unwrap().len(), 4);
    assert_eq!(*recorder.errors.lock().unwrap(), ["deck.pdf (page 2)"]);
}

#[test]
fn test_page_images_failure_is_isolated_to_page() {
    let (engine, _) = fake_engine();
    let job = BatchJob::new(page_images_config()).input("deck.pdf", b"FAKEPDF:3:fail=2".to_vec());

    let output = process_batch(&engine, job).unwrap();
    assert_eq!(
        output.filenames(),
        ["deck_page_1_inverted.png", "deck_page_3_inverted.png"]
    );
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].page, Some(2));
    assert!(matches!(
        output.failures[0].error,
        ItemError::RasterizationFailed { page: 2, .. }
    ));
}

#[test]
fn test_uncountable_pdf_contributes_zero_units_but_is_attempted() {
    let (engine, backend) = fake_engine();
    let recorder = Arc::new(Recorder::default());
    let cfg = BatchConfig::builder()
        .pdf_output(PdfOutput::PageImages)
        .progress_callback(recorder.clone())
        .build()
        .unwrap();
    let job = BatchJob::new(cfg)
        .input("odd.pdf", b"FAKEPDF:2:nocount".to_vec())
        .input("x.png", png([0, 0, 0]));

    let output = process_batch(&engine, job).unwrap();
    assert_eq!(*recorder.start.lock().unwrap(), Some(1));
    assert_eq!(output.stats.units_total, 1);
    assert_eq!(output.stats.units_completed, 3);
    assert_eq!(output.artifacts.len(), 3);
    assert_eq!(backend.opened.load(Ordering::SeqCst), 1);

    let last = recorder.states.lock().unwrap().last().cloned().unwrap();
    assert_eq!(last.fraction(), 1.0);
}

#[test]
fn test_unreadable_pdf_advances_progress_once() {
    let (engine, _) = fake_engine();
    let recorder = Arc::new(Recorder::default());
    let cfg = BatchConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();
    let job = BatchJob::new(cfg)
        .input("junk.pdf", b"%PDF-1.7 garbage".to_vec())
        .input("x.png", png([0, 0, 0]));

    let output = process_batch(&engine, job).unwrap();
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].page, None);
    assert_eq!(output.failures[0].error.kind(), "decode_error");
    assert_eq!(output.stats.units_total, 1);
    assert_eq!(output.stats.units_completed, 1);
}

#[test]
fn test_empty_document_is_recorded_as_failure() {
    let (engine, _) = fake_engine();
    let job = BatchJob::new(page_images_config())
        .input("empty.pdf", b"FAKEPDF:0".to_vec())
        .input("a.png", png([0, 0, 0]));

    let output = process_batch(&engine, job).unwrap();
    assert_eq!(output.filenames(), ["a_inverted.png"]);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].input, "empty.pdf");
    assert_eq!(output.failures[0].page, None);
    assert_eq!(output.failures[0].error.kind(), "decode_error");
    assert_eq!(output.stats.units_total, 1);
    assert_eq!(output.stats.units_completed, 1);
}

#[test]
fn test_lone_empty_document_names_its_error() {
    let (engine, _) = fake_engine();
    let job = BatchJob::new(config()).input("empty.pdf", b"FAKEPDF:0".to_vec());

    match process_batch(&engine, job).unwrap_err() {
        InksaverError::NothingSucceeded {
            failed,
            total,
            first_error,
        } => {
            assert_eq!((failed, total), (1, 1));
            assert!(first_error.starts_with("empty.pdf"), "got {first_error}");
            assert!(first_error.contains("no pages"), "got {first_error}");
        }
        other => panic!("expected NothingSucceeded, got {other:?}"),
    }
}

#[test]
fn test_document_handles_are_released() {
    let (engine, backend) = fake_engine();
    let job = BatchJob::new(page_images_config())
        .input("a.pdf", b"FAKEPDF:2".to_vec())
        .input("b.pdf", b"FAKEPDF:2:fail=1".to_vec());
    process_batch(&engine, job).unwrap();
    assert_eq!(backend.opened.load(Ordering::SeqCst), 2);
    assert_eq!(backend.open_handles.load(Ordering::SeqCst), 0);
}

#[test]
fn test_render_matches_page_count() {
    let backend = FakeBackend::default();
    for pages in [1, 2, 7] {
        let bytes = format!("FAKEPDF:{pages}").into_bytes();
        let count = inksaver::pipeline::render::page_count(Some(&backend as &dyn RenderBackend), &bytes).unwrap();
        for scale in [1.0, 1.5, 2.0] {
            let rendered = inksaver::pipeline::render::render(Some(&backend as &dyn RenderBackend), &bytes, scale).unwrap();
            assert_eq!(rendered.len(), count);
            assert!(rendered.iter().enumerate().all(|(i, p)| p.page_index == i));
        }
    }
}

#[test]
fn test_no_backend_rejects_pdfs_only() {
    let job = BatchJob::new(config())
        .input("slides.pdf", b"FAKEPDF:3".to_vec())
        .input("terminal.png", png([0, 0, 0]));

    let output = process_batch(&Engine::without_backend(), job).unwrap();
    assert_eq!(output.filenames(), ["terminal_inverted.png"]);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].error, ItemError::BackendUnavailable);
    assert_eq!(output.stats.backend, None);
}

// ── Batch-level behaviour ────────────────────────────────────────────────────

#[test]
fn test_unsupported_extension_is_recorded_not_attempted() {
    let recorder = Arc::new(Recorder::default());
    let cfg = BatchConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();
    let job = BatchJob::new(cfg)
        .input("notes.txt", b"hello".to_vec())
        .input("a.png", png([0, 0, 0]));

    let output = process_batch(&Engine::without_backend(), job).unwrap();
    assert_eq!(output.stats.units_total, 1);
    assert_eq!(output.stats.total_inputs, 2);
    assert_eq!(
        output.failures[0].error,
        ItemError::UnsupportedInput {
            extension: "txt".into()
        }
    );
    assert_eq!(recorder.states.lock().unwrap().len(), 1);
}

#[test]
fn test_duplicate_names_are_disambiguated() {
    let job = BatchJob::new(config())
        .input("scan.png", png([0, 0, 0]))
        .input("scan.jpg", encoded(ImageFormat::Jpeg, [0, 0, 0]))
        .input("other/scan.png", png([1, 1, 1]));

    let output = process_batch(&Engine::without_backend(), job).unwrap();
    assert_eq!(
        output.filenames(),
        ["scan_inverted.png", "scan_inverted_2.png", "scan_inverted_3.png"]
    );
}

#[test]
fn test_pdfs_are_processed_before_images() {
    let (engine, _) = fake_engine();
    let recorder = Arc::new(Recorder::default());
    let cfg = BatchConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();
    let job = BatchJob::new(cfg)
        .input("a.png", png([0, 0, 0]))
        .input("deck.pdf", b"FAKEPDF:2".to_vec());

    let output = process_batch(&engine, job).unwrap();
    assert_eq!(output.filenames(), ["deck_inverted.pdf", "a_inverted.png"]);

    let states = recorder.states.lock().unwrap();
    let labels: Vec<&str> = states.iter().map(|s| s.current_label.as_str()).collect();
    assert_eq!(labels, ["deck.pdf (page 1/2)", "deck.pdf (page 2/2)", "a.png"]);
    let completed: Vec<usize> = states.iter().map(|s| s.completed_units).collect();
    assert_eq!(completed, [1, 2, 3]);
    assert!(states.iter().all(|s| s.total_units == 3));
    assert_eq!(*recorder.complete.lock().unwrap(), Some((2, 0)));
}

#[test]
fn test_nothing_succeeded_reports_counts() {
    let job = BatchJob::new(config())
        .input("a.png", b"nope".to_vec())
        .input("b.pdf", b"FAKEPDF:1".to_vec());

    let err = process_batch(&Engine::without_backend(), job).unwrap_err();
    match err {
        InksaverError::NothingSucceeded {
            failed,
            total,
            first_error,
        } => {
            assert_eq!((failed, total), (2, 2));
            assert!(first_error.starts_with("b.pdf"), "got {first_error}");
        }
        other => panic!("expected NothingSucceeded, got {other:?}"),
    }
}

#[test]
fn test_empty_batch_is_fatal() {
    let err = process_batch(&Engine::without_backend(), BatchJob::new(config())).unwrap_err();
    assert!(matches!(err, InksaverError::EmptyBatch));
}

// ── Delivery ─────────────────────────────────────────────────────────────────

#[test]
fn test_archive_entries_are_byte_identical() {
    let (engine, _) = fake_engine();
    let job = BatchJob::new(config())
        .input("deck.pdf", b"FAKEPDF:2".to_vec())
        .input("a.png", png([0, 0, 0]))
        .input("b.png", png([9, 9, 9]));

    let output = process_batch(&engine, job).unwrap();
    let artifacts = output.artifacts.clone();
    let delivery = deliver(output, inksaver::DEFAULT_ARCHIVE_NAME).unwrap();

    let Delivery::Archive(archive) = delivery else {
        panic!("three artifacts must be archived");
    };
    assert_eq!(archive.filename(), "inverted_files.tar.gz");
    assert_eq!(archive.mime_hint(), "application/gzip");

    let entries = unpack(archive.bytes());
    assert_eq!(entries.len(), artifacts.len());
    for ((name, data), artifact) in entries.iter().zip(&artifacts) {
        assert_eq!(name, artifact.filename());
        assert_eq!(data.as_slice(), artifact.bytes());
    }
}

#[test]
fn test_single_artifact_delivered_raw() {
    let job = BatchJob::new(config()).input("only.png", png([0, 0, 0]));
    let output = process_batch(&Engine::without_backend(), job).unwrap();
    let expected = output.artifacts[0].bytes().to_vec();

    let delivery = deliver(output, inksaver::DEFAULT_ARCHIVE_NAME).unwrap();
    assert!(!delivery.is_archive());
    assert_eq!(delivery.content_type(), "image/png");
    assert_eq!(delivery.bytes(), expected.as_slice());
}

// ── Async entry point ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_async_batch_matches_sync() {
    let (engine, _) = fake_engine();
    let make_job = || {
        BatchJob::new(page_images_config())
            .input("slide.pdf", b"FAKEPDF:2".to_vec())
            .input("a.png", png([5, 5, 5]))
    };

    let sync_out = process_batch(&engine, make_job()).unwrap();
    let async_out = process_batch_async(engine.clone(), make_job()).await.unwrap();
    assert_eq!(sync_out.artifacts, async_out.artifacts);
}

#[test]
fn test_callback_and_engine_are_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Recorder>();
    assert_send_sync::<Engine>();
    assert_send_sync::<BatchJob>();
}
