//! Pipeline stages for stamping a PDF page.
//!
//! Each submodule implements exactly one step, so the pure parts stay
//! testable without a pdfium library present.
//!
//! ## Data Flow
//!
//! ```text
//! content ──▶ document ──▶ overlay ──▶ document::save
//! (sniff/read) (open, page)  (draw)      (atomic write)
//! ```
//!
//! 1. [`content`]  — open the content file, classify it, read it
//! 2. [`document`] — bind pdfium, open or create the PDF, pick or append
//!    the page, apply orientation, and finally persist
//! 3. [`overlay`]  — flip the rectangle into PDF space and draw text or
//!    image objects

pub mod content;
pub mod document;
pub mod overlay;
