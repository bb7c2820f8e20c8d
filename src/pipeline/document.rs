//! Document handling via pdfium: bind, open or create, pick the page, save.
//!
//! ## Why a shared binding?
//!
//! pdfium-render refuses to bind the library a second time in one process,
//! so [`pdfium`] binds once and hands out a `'static` reference. The
//! `thread_safe` feature serialises calls into the library.
//!
//! ## Why save through memory?
//!
//! The output path may be the input document itself, which pdfium keeps
//! open and reads lazily. The document is therefore serialised to a byte
//! buffer and released before anything touches the file system; the bytes
//! then go to a temp file next to the output and are renamed over it, so a
//! failed write never leaves a truncated PDF behind.

use crate::config::{Orientation, PageTarget, StampConfig};
use crate::error::StampError;
use crate::geometry::PageExtent;
use pdfium_render::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Environment variable naming an existing libpdfium (file or directory).
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// pdfium can only be bound once per process; the outcome is kept here.
static PDFIUM: OnceLock<Result<Pdfium, String>> = OnceLock::new();

/// The process-wide pdfium binding, created on first use.
///
/// Search order: `PDFIUM_LIB_PATH`, the current directory, then the system
/// library paths. A failed bind is remembered; later calls fail the same way.
pub fn pdfium() -> Result<&'static Pdfium, StampError> {
    PDFIUM
        .get_or_init(bind_library)
        .as_ref()
        .map_err(|detail| StampError::PdfiumBindingFailed(detail.clone()))
}

fn bind_library() -> Result<Pdfium, String> {
    let bindings = match std::env::var_os(PDFIUM_LIB_PATH_ENV).map(PathBuf::from) {
        Some(path) => {
            let library = if path.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&path)
            } else {
                path
            };
            debug!("Binding pdfium from {}", library.display());
            Pdfium::bind_to_library(&library)
        }
        None => Pdfium::bind_to_library(&Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| format!("{:?}", e))?;

    Ok(Pdfium::new(bindings))
}

/// Open `path`, or start an empty document if it does not exist.
///
/// Returns the document and whether it was newly created.
pub fn open_or_create<'a>(
    pdfium: &'a Pdfium,
    path: &Path,
) -> Result<(PdfDocument<'a>, bool), StampError> {
    if !path.exists() {
        info!("{} does not exist, creating a new document", path.display());
        let document = pdfium
            .create_new_pdf()
            .map_err(|e| StampError::CorruptPdf {
                path: path.to_path_buf(),
                detail: format!("{:?}", e),
            })?;
        return Ok((document, true));
    }

    let document = pdfium.load_pdf_from_file(path, None).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            StampError::PasswordRequired {
                path: path.to_path_buf(),
            }
        } else {
            StampError::CorruptPdf {
                path: path.to_path_buf(),
                detail: err_str,
            }
        }
    })?;
    debug!("Opened {} ({} pages)", path.display(), document.pages().len());
    Ok((document, false))
}

/// The page chosen to receive the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreparedPage {
    /// 0-based page index.
    pub index: usize,
    /// Whether the page was appended by this run.
    pub created: bool,
    /// Page size after orientation.
    pub extent: PageExtent,
}

/// Select or append the target page and apply the configured orientation.
pub fn prepare_page(
    document: &mut PdfDocument<'_>,
    config: &StampConfig,
) -> Result<PreparedPage, StampError> {
    let total = document.pages().len() as usize;

    let (index, created) = match config.page {
        PageTarget::Append => {
            let size = config
                .orientation
                .map_or(config.new_page_size, |o| o.apply(config.new_page_size));
            document
                .pages_mut()
                .create_page_at_end(PdfPagePaperSize::Custom(
                    PdfPoints::new(size.width as f32),
                    PdfPoints::new(size.height as f32),
                ))
                .map_err(|e| StampError::PageSetupFailed {
                    page: total,
                    detail: format!("{:?}", e),
                })?;
            info!("Appended page {} ({}×{} pt)", total, size.width, size.height);
            (total, true)
        }
        PageTarget::Index(page) if page < total => (page, false),
        PageTarget::Index(page) => return Err(StampError::PageOutOfRange { page, total }),
    };

    let mut page = document
        .pages()
        .get(index as PdfPageIndex)
        .map_err(|e| StampError::PageSetupFailed {
            page: index,
            detail: format!("{:?}", e),
        })?;

    let mut extent = PageExtent::new(page.width().value as f64, page.height().value as f64);
    if let Some(orientation) = config.orientation {
        extent = orient(&mut page, index, extent, orientation)?;
    }

    Ok(PreparedPage {
        index,
        created,
        extent,
    })
}

/// Swap the media box when the page does not already have `orientation`.
fn orient(
    page: &mut PdfPage<'_>,
    index: usize,
    extent: PageExtent,
    orientation: Orientation,
) -> Result<PageExtent, StampError> {
    let oriented = orientation.apply(extent);
    if oriented == extent {
        return Ok(extent);
    }

    let setup_failed = |e: PdfiumError| StampError::PageSetupFailed {
        page: index,
        detail: format!("{:?}", e),
    };

    // Keep the media box's lower-left corner where it was.
    let media = page.boundaries().media().map_err(setup_failed)?.bounds;
    let (left, bottom) = (media.left.value, media.bottom.value);
    page.boundaries_mut()
        .set_media(PdfRect::new_from_values(
            bottom,
            left,
            bottom + oriented.height as f32,
            left + oriented.width as f32,
        ))
        .map_err(setup_failed)?;
    debug!(
        "Page {} reoriented to {:?}: {}×{} pt",
        index, orientation, oriented.width, oriented.height
    );
    Ok(oriented)
}

/// Serialise `document` and atomically write it to `output`.
pub fn save(document: PdfDocument<'_>, output: &Path) -> Result<(), StampError> {
    let bytes = document
        .save_to_bytes()
        .map_err(|e| StampError::SaveFailed {
            detail: format!("{:?}", e),
        })?;
    drop(document);

    let write_failed = |source: std::io::Error| StampError::OutputWriteFailed {
        path: output.to_path_buf(),
        source,
    };

    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_failed)?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(write_failed)?;
    tmp.write_all(&bytes).map_err(write_failed)?;
    tmp.persist(output).map_err(|e| write_failed(e.error))?;

    info!("Saved {} bytes to {}", bytes.len(), output.display());
    Ok(())
}
