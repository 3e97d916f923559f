//! # pdfium-locate
//!
//! Find an installed [PDFium](https://pdfium.googlesource.com/pdfium/) shared
//! library and bind `pdfium-render` to it, so callers do not have to fiddle
//! with `DYLD_LIBRARY_PATH` / `LD_LIBRARY_PATH` before the first render.
//!
//! ## Search order
//!
//! [`find_pdfium_library`] walks [`candidate_paths`] and returns the first
//! file that exists:
//!
//! 1. `PDFIUM_LIB_PATH`: a library file, or a directory containing one.
//! 2. The per-user cache directory, see [`pdfium_cache_dir`].
//! 3. The directory of the running executable.
//!
//! [`bind_pdfium`] binds to that file, and falls back to the platform loader
//! (`Pdfium::bind_to_system_library`) when no candidate exists.
//!
//! ```rust,no_run
//! let pdfium = pdfium_locate::bind_pdfium().expect("PDFium unavailable");
//! ```
//!
//! ## Platform support
//!
//! | OS      | Library               |
//! |---------|-----------------------|
//! | macOS   | `libpdfium.dylib`     |
//! | Linux   | `libpdfium.so`        |
//! | Windows | `pdfium.dll`          |
//!
//! ## Environment variable overrides
//!
//! - `PDFIUM_LIB_PATH`: path to an existing pdfium library (or its directory).
//! - `INKSAVER_PDFIUM_DIR`: override the default cache directory.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use pdfium_render::prelude::Pdfium;
use thiserror::Error;
use tracing::debug;

/// Errors returned by pdfium-locate operations.
#[derive(Error, Debug)]
pub enum LocateError {
    /// The current OS has no known PDFium library name.
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// `pdfium-render` could not load the library at `path`.
    #[error("Failed to bind PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },

    /// Neither a candidate file nor the system loader yielded a library.
    #[error("No PDFium library found (searched: {searched}); system loader: {reason}")]
    NotFound { searched: String, reason: String },
}

// ── Platform metadata ────────────────────────────────────────────────────────

/// Filename of the PDFium shared library on the current platform.
pub fn platform_library_name() -> Result<&'static str, LocateError> {
    match std::env::consts::OS {
        "macos" => Ok("libpdfium.dylib"),
        "linux" | "freebsd" | "openbsd" | "netbsd" | "android" => Ok("libpdfium.so"),
        "windows" => Ok("pdfium.dll"),
        os => Err(LocateError::UnsupportedPlatform {
            os: os.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }),
    }
}

// ── Cache directory resolution ───────────────────────────────────────────────

/// Returns the per-user directory searched for a PDFium library.
///
/// Default locations:
/// - **macOS**: `~/Library/Caches/inksaver/pdfium/`
/// - **Linux**: `~/.cache/inksaver/pdfium/`
/// - **Windows**: `%LOCALAPPDATA%\inksaver\pdfium\`
///
/// Override by setting `INKSAVER_PDFIUM_DIR`.
pub fn pdfium_cache_dir() -> PathBuf {
    if let Ok(override_dir) = std::env::var("INKSAVER_PDFIUM_DIR") {
        return PathBuf::from(override_dir);
    }

    let base = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir);

    base.join("inksaver").join("pdfium")
}

// ── Candidate search ─────────────────────────────────────────────────────────

static RESOLVED_PATH: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Every location checked for a PDFium library, in priority order.
///
/// Paths are returned whether or not they exist.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    let lib_name = platform_library_name().ok();

    if let Ok(env_path) = std::env::var("PDFIUM_LIB_PATH") {
        if !env_path.is_empty() {
            let p = PathBuf::from(env_path);
            match lib_name {
                Some(name) if p.is_dir() => candidates.push(p.join(name)),
                _ => candidates.push(p),
            }
        }
    }

    if let Some(name) = lib_name {
        candidates.push(pdfium_cache_dir().join(name));

        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            candidates.push(exe_dir.join(name));
        }
    }

    candidates
}

/// Returns the first existing candidate library file, if any.
///
/// Does not consult the system loader path.
pub fn find_pdfium_library() -> Option<PathBuf> {
    candidate_paths().into_iter().find(|p| p.is_file())
}

/// Like [`find_pdfium_library`], but the search runs once per process.
pub fn cached_pdfium_path() -> Option<PathBuf> {
    RESOLVED_PATH.get_or_init(find_pdfium_library).clone()
}

// ── Binding ──────────────────────────────────────────────────────────────────

/// Binds to PDFium: the first candidate file if one exists, otherwise the
/// library the platform loader can find by name.
pub fn bind_pdfium() -> Result<Pdfium, LocateError> {
    if let Some(path) = cached_pdfium_path() {
        debug!("Binding PDFium from {}", path.display());
        return bind_pdfium_from_path(&path);
    }

    debug!("No PDFium candidate file; trying the system loader");
    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| LocateError::NotFound {
            searched: candidate_paths()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            reason: e.to_string(),
        })
}

/// Binds to a PDFium library at an explicit `path`.
pub fn bind_pdfium_from_path(path: &Path) -> Result<Pdfium, LocateError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| LocateError::Bind {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
