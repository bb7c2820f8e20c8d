//! Error types for the pdfstamp library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`StampError`] — **Fatal**: no output document can be produced
//!   (pdfium missing, corrupt input, page out of range, unwritable output).
//!   Returned as `Err(StampError)` from [`crate::stamp::stamp`].
//!
//! * [`OverlayError`] — **Non-fatal**: the overlay step could not run (bad
//!   rectangle, unrecognised content, undecodable image). The document is
//!   still saved without the overlay, and the error is carried in
//!   [`crate::stamp::StampReport`] so the caller can report it.
//!
//! Nothing is ever guessed: a bad rectangle is never replaced by a partial
//! one, and undetected content is never drawn as some assumed kind.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfstamp library.
#[derive(Debug, Error)]
pub enum StampError {
    // ── Document errors ──────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password; stamping encrypted documents is not supported.
    #[error("PDF '{path}' is encrypted and requires a password")]
    PasswordRequired { path: PathBuf },

    /// Requested page index does not exist.
    #[error("Page index {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium-render rejected a page-level operation (create, resize).
    #[error("Page {page} could not be prepared: {detail}")]
    PageSetupFailed { page: usize, detail: String },

    /// pdfium could not serialise the document.
    #[error("Failed to serialise PDF: {detail}")]
    SaveFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium (e.g. from bblanchon/pdfium-binaries) and either:\n\
  • place it in the current directory or a system library path, or\n\
  • set PDFIUM_LIB_PATH=/path/to/libpdfium (file or directory).\n"
    )]
    PdfiumBindingFailed(String),
}

/// A non-fatal error that skips the overlay but still saves the document.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayError {
    /// The rectangle spec is malformed: wrong field count, a non-numeric
    /// field, or a non-finite value. `field` is the offending text.
    #[error("Invalid rectangle '{field}': {reason}")]
    Format { field: String, reason: String },

    /// The content matched no known signature and no type was given.
    #[error("Can't detect content type of '{path}'! Please specify it in the command, e.g. -t image_png")]
    UnsupportedContent { path: PathBuf },

    /// The content file could not be opened or read.
    #[error("Cannot read content file '{path}': {detail}")]
    ContentUnreadable { path: PathBuf, detail: String },

    /// The image bytes could not be decoded.
    #[error("Failed to decode {kind} content: {detail}")]
    ImageDecode { kind: String, detail: String },

    /// pdfium-render rejected the text or image object.
    #[error("Drawing on page {page} failed: {detail}")]
    RenderFailed { page: usize, detail: String },
}

impl OverlayError {
    pub(crate) fn format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        OverlayError::Format {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
