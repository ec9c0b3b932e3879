//! Input resolution: expand a user-supplied path to the list of PDFs to
//! process.
//!
//! A single file is validated eagerly (existence, readability, `%PDF` magic
//! bytes) so the user gets a meaningful error up front rather than a pdfium
//! failure later. A directory is scanned non-recursively for `.pdf` files;
//! per-file validation then happens inside the batch loop so one bad file
//! cannot abort the run.

use crate::error::SplitMdError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Expand `input` into the ordered list of PDF files to process.
///
/// * A file path yields a single-element list after magic-byte validation.
/// * A directory yields all `.pdf` files directly inside it (no recursion),
///   sorted by name so batch output and reports are deterministic.
///
/// # Errors
/// Fatal: path missing, unreadable, not a PDF (single-file case), a
/// directory with no PDFs, or a path that is neither file nor directory.
pub fn resolve_inputs(input: &Path) -> Result<Vec<PathBuf>, SplitMdError> {
    if !input.exists() {
        return Err(SplitMdError::InputNotFound {
            path: input.to_path_buf(),
        });
    }

    if input.is_file() {
        validate_pdf_file(input)?;
        debug!("Resolved single PDF: {}", input.display());
        return Ok(vec![input.to_path_buf()]);
    }

    if input.is_dir() {
        let mut pdfs: Vec<PathBuf> = std::fs::read_dir(input)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::PermissionDenied => SplitMdError::PermissionDenied {
                    path: input.to_path_buf(),
                },
                _ => SplitMdError::InputNotFound {
                    path: input.to_path_buf(),
                },
            })?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && has_pdf_extension(p))
            .collect();

        if pdfs.is_empty() {
            return Err(SplitMdError::EmptyDirectory {
                path: input.to_path_buf(),
            });
        }

        pdfs.sort();
        info!("Found {} PDF files in {}", pdfs.len(), input.display());
        return Ok(pdfs);
    }

    Err(SplitMdError::UnsupportedInput {
        path: input.to_path_buf(),
    })
}

/// Case-insensitive `.pdf` extension check.
fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Validate existence, readability, and the `%PDF` magic bytes.
fn validate_pdf_file(path: &Path) -> Result<(), SplitMdError> {
    match std::fs::File::open(path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(SplitMdError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(SplitMdError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(SplitMdError::InputNotFound {
            path: path.to_path_buf(),
        }),
    }
}
