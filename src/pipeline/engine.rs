//! pdfium binding resolution.
//!
//! pdfium is a shared library loaded at runtime, not a Rust dependency, so
//! the first thing a run does is find a copy to bind to. Resolution order:
//!
//! 1. `SPLITMD_PDFIUM_PATH`, an explicit directory (or file path) set by
//!    the user; always wins.
//! 2. The current working directory.
//! 3. The system library search path.
//!
//! The binding is created once per run and shared by every stage that talks
//! to pdfium; `PdfDocument` values borrow from it, which is what forces the
//! strictly sequential open-split-convert-close lifecycle per file.

use crate::error::SplitMdError;
use pdfium_render::prelude::*;
use tracing::debug;

/// Environment variable pointing at a directory containing the pdfium
/// shared library (or the library file itself).
pub const PDFIUM_LIB_PATH_ENV: &str = "SPLITMD_PDFIUM_PATH";

/// Bind to a pdfium library, trying the env override, the current
/// directory, then the system search path.
pub fn create_pdfium() -> Result<Pdfium, SplitMdError> {
    if let Ok(dir) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        if !dir.is_empty() {
            debug!("Binding pdfium from {}={}", PDFIUM_LIB_PATH_ENV, dir);
            let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                &dir,
            ))
            .or_else(|_| Pdfium::bind_to_library(&dir))
            .map_err(|e| SplitMdError::PdfiumBindingFailed(format!("{:?}", e)))?;
            return Ok(Pdfium::new(bindings));
        }
    }

    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| SplitMdError::PdfiumBindingFailed(format!("{:?}", e)))?;

    debug!("pdfium binding resolved");
    Ok(Pdfium::new(bindings))
}
