//! CLI binary for inksaver.
//!
//! A thin shim over the library crate: reads the named files, maps CLI flags
//! to `BatchConfig`, and writes the delivery to disk.

use anyhow::{Context, Result};
use clap::Parser;
use inksaver::{
    deliver, process_batch_async, write_file, BackendKind, BatchConfig, BatchJob, BatchOutput,
    BatchProgressCallback, Engine, NamingSuffix, OutputFormat, PageNamingLayout, PdfOutput,
    ProgressCallback, ProgressState, Resolution,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over all units plus a log line per
/// failed item.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Spinner until `on_batch_start` reports the unit count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Counting pages…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} units  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Inverting");
        self.bar.reset_eta();
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_units: usize) {
        self.activate_bar(total_units);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total_units} units…"))
        ));
    }

    fn on_unit_complete(&self, state: &ProgressState) {
        // A PDF whose pages could not be counted up front can push past the
        // precomputed total.
        if state.completed_units as u64 > self.bar.length().unwrap_or(0) {
            self.bar.set_length(state.completed_units as u64);
        }
        self.bar.set_position(state.completed_units as u64);
        self.bar.set_message(state.current_label.clone());
    }

    fn on_item_error(&self, label: &str, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 80 {
            let cut: String = error.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };
        self.bar
            .println(format!("  {} {}  {}", red("✗"), label, red(&msg)));
    }

    fn on_batch_complete(&self, artifacts: usize, failures: usize) {
        self.bar.finish_and_clear();
        if failures == 0 {
            eprintln!(
                "{} {} files processed successfully",
                green("✔"),
                bold(&artifacts.to_string())
            );
        } else {
            eprintln!(
                "{} {} files processed  ({} failed)",
                if artifacts == 0 { red("✘") } else { cyan("⚠") },
                bold(&artifacts.to_string()),
                red(&failures.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # One dark slide deck → slides_inverted.pdf
  inksaver slides.pdf

  # Several files → inverted_files.tar.gz
  inksaver deck.pdf terminal.png notes.jpg

  # Every PDF page as its own JPEG, at print resolution, into a directory
  inksaver --pdf-output pages --format jpg --resolution 2x --out-dir out/ deck.pdf

  # Name the archive
  inksaver *.png -o printable.tar.gz

  # Show which PDF backends this machine has
  inksaver --list-backends

NAMING:
  photo.png                       → photo_inverted.png
  slide.pdf (document)            → slide_inverted.pdf
  slide.pdf (pages, name-page-n)  → slide_page_1_inverted.png, …
  Duplicate names get _2, _3, … before the extension.

PDF BACKENDS (tried in this order):
  pdfium    libpdfium via PDFIUM_LIB_PATH, the cache dir, next to the binary,
            or the system library path
  poppler   pdftoppm and pdfinfo on PATH

  Images are processed even when no PDF backend is available.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  INKSAVER_PDFIUM_DIR     Override the pdfium cache directory
  RUST_LOG                Override the log filter
"#;

/// Invert dark PDFs and images for ink-saving printing.
#[derive(Parser, Debug)]
#[command(
    name = "inksaver",
    version,
    about = "Invert dark PDFs and images for ink-saving printing",
    long_about = "Color-invert dark-background PDFs and images so they print on white. \
PDF pages are rasterised, inverted and reassembled at their original page size; images \
are inverted directly. One result is written as-is, several are packed into a .tar.gz.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF or image files (pdf, png, jpg, jpeg, bmp, tif, tiff).
    #[arg(required_unless_present = "list_backends")]
    inputs: Vec<PathBuf>,

    /// Write the single result or the archive to this path.
    #[arg(short, long, env = "INKSAVER_OUTPUT", conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Write every result as its own file into this directory (no archive).
    #[arg(long, env = "INKSAVER_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Suffix added to output names.
    #[arg(long, env = "INKSAVER_SUFFIX", value_enum, default_value = "inverted")]
    suffix: SuffixArg,

    /// Encoding for image outputs.
    #[arg(long, env = "INKSAVER_FORMAT", value_enum, default_value = "png")]
    format: FormatArg,

    /// PDF rasterisation resolution (1x = 150 DPI).
    #[arg(long, env = "INKSAVER_RESOLUTION", value_enum, default_value = "1x")]
    resolution: ResolutionArg,

    /// Where the page number goes in per-page names.
    #[arg(long, env = "INKSAVER_PAGE_LAYOUT", value_enum, default_value = "name-page-n")]
    page_layout: LayoutArg,

    /// What a PDF produces: one PDF, or one image per page.
    #[arg(long, env = "INKSAVER_PDF_OUTPUT", value_enum, default_value = "document")]
    pdf_output: PdfOutputArg,

    /// JPEG quality (1–100).
    #[arg(long, env = "INKSAVER_JPEG_QUALITY", default_value_t = 75,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// PDF backend to use.
    #[arg(long, env = "INKSAVER_BACKEND", value_enum, default_value = "auto")]
    backend: BackendArg,

    /// Print a JSON report on stdout.
    #[arg(long, env = "INKSAVER_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "INKSAVER_NO_PROGRESS")]
    no_progress: bool,

    /// List detected PDF backends and exit.
    #[arg(long)]
    list_backends: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "INKSAVER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "INKSAVER_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SuffixArg {
    Inverted,
    InkSaver,
    PrintReady,
}

impl From<SuffixArg> for NamingSuffix {
    fn from(v: SuffixArg) -> Self {
        match v {
            SuffixArg::Inverted => NamingSuffix::Inverted,
            SuffixArg::InkSaver => NamingSuffix::InkSaver,
            SuffixArg::PrintReady => NamingSuffix::PrintReady,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Png,
    Jpg,
    Keep,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Jpg => OutputFormat::Jpg,
            FormatArg::Keep => OutputFormat::KeepOriginal,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ResolutionArg {
    #[value(name = "1x")]
    Standard,
    #[value(name = "1.5x")]
    Fine,
    #[value(name = "2x")]
    Print,
}

impl From<ResolutionArg> for Resolution {
    fn from(v: ResolutionArg) -> Self {
        match v {
            ResolutionArg::Standard => Resolution::Standard,
            ResolutionArg::Fine => Resolution::Fine,
            ResolutionArg::Print => Resolution::Print,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LayoutArg {
    NamePageN,
    NamePn,
    PageNName,
}

impl From<LayoutArg> for PageNamingLayout {
    fn from(v: LayoutArg) -> Self {
        match v {
            LayoutArg::NamePageN => PageNamingLayout::NamePageN,
            LayoutArg::NamePn => PageNamingLayout::NamePN,
            LayoutArg::PageNName => PageNamingLayout::PageNName,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PdfOutputArg {
    Document,
    Pages,
}

impl From<PdfOutputArg> for PdfOutput {
    fn from(v: PdfOutputArg) -> Self {
        match v {
            PdfOutputArg::Document => PdfOutput::Document,
            PdfOutputArg::Pages => PdfOutput::PageImages,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum BackendArg {
    Auto,
    Pdfium,
    Poppler,
    None,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Backend listing ──────────────────────────────────────────────────
    if cli.list_backends {
        list_backends(cli.json)?;
        return Ok(());
    }

    // ── Resolve backend ──────────────────────────────────────────────────
    let engine = match cli.backend {
        BackendArg::Auto => Engine::detect(),
        BackendArg::Pdfium => Engine::from_kind(BackendKind::Pdfium)?,
        BackendArg::Poppler => Engine::from_kind(BackendKind::Poppler)?,
        BackendArg::None => Engine::without_backend(),
    };

    // ── Build job ────────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;
    let archive_name = config.archive_name.clone();

    let mut job = BatchJob::new(config);
    for path in &cli.inputs {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        job = job.input(input_name(path), bytes);
    }

    // ── Run batch ────────────────────────────────────────────────────────
    let output = process_batch_async(engine, job)
        .await
        .context("Processing failed")?;

    if !cli.quiet && !show_progress && !cli.json {
        eprintln!("{}  {}ms", output.summary(), output.stats.duration_ms);
        for failure in &output.failures {
            eprintln!("  {} {}: {}", red("✗"), failure.label(), failure.error);
        }
    }

    // ── Write results ────────────────────────────────────────────────────
    let report = serde_json::json!({
        "summary": output.summary(),
        "stats": &output.stats,
        "failures": &output.failures,
        "artifacts": output.filenames(),
    });

    let written = if let Some(ref dir) = cli.out_dir {
        write_all(&output, dir)?
    } else {
        let delivery = deliver(output, &archive_name).context("Failed to package results")?;
        let path = cli
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(delivery.filename()));
        delivery
            .write_to(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        vec![path]
    };

    if cli.json {
        let mut report = report;
        report["written"] = serde_json::json!(written);
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else if !cli.quiet {
        for path in &written {
            eprintln!("   {} {}", dim("→"), bold(&path.display().to_string()));
        }
    }

    Ok(())
}

/// Map CLI args to `BatchConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<BatchConfig> {
    let mut builder = BatchConfig::builder()
        .naming_suffix(cli.suffix.into())
        .output_format(cli.format.into())
        .resolution(cli.resolution.into())
        .page_layout(cli.page_layout.into())
        .pdf_output(cli.pdf_output.into())
        .jpeg_quality(cli.jpeg_quality);

    // `-o` names the archive too, so the archive's inner name matches.
    if let Some(name) = cli.output.as_deref().and_then(Path::file_name) {
        builder = builder.archive_name(name.to_string_lossy());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// The name the library sees: the file name without directories.
fn input_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Write every artifact into `dir` under its own name.
fn write_all(output: &BatchOutput, dir: &Path) -> Result<Vec<PathBuf>> {
    output
        .artifacts
        .iter()
        .map(|artifact| {
            let path = dir.join(artifact.filename());
            write_file(&path, artifact.bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(path)
        })
        .collect()
}

fn list_backends(json: bool) -> Result<()> {
    // Ok carries whether page sizes are read from the document.
    let rows: Vec<(BackendKind, std::result::Result<bool, String>)> = BackendKind::PRIORITY
        .iter()
        .map(|&kind| (kind, kind.probe().map(|b| b.reports_native_geometry())))
        .collect();

    if json {
        let value: Vec<_> = rows
            .iter()
            .map(|(kind, result)| {
                serde_json::json!({
                    "backend": kind.name(),
                    "available": result.is_ok(),
                    "native_geometry": result.as_ref().ok(),
                    "reason": result.as_ref().err(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&value).context("Failed to serialise backends")?
        );
        return Ok(());
    }

    for (rank, (kind, result)) in rows.iter().enumerate() {
        match result {
            Ok(native) => {
                let geometry = if *native {
                    "page size from document"
                } else {
                    "page size from raster"
                };
                println!("{}. {} {}  {}", rank + 1, green("✓"), kind, dim(geometry))
            }
            Err(reason) => println!("{}. {} {}  {}", rank + 1, red("✗"), kind, dim(reason)),
        }
    }
    Ok(())
}
