//! The stamping entry point.
//!
//! [`stamp`] is fail-soft at the document level and fail-strict at the
//! overlay level: whenever the document can be opened, an output file is
//! written. If the rectangle spec is malformed or the content cannot be
//! identified or drawn, the overlay is skipped and the reason is returned in
//! [`StampReport::overlay_error`].

use crate::config::StampConfig;
use crate::error::{OverlayError, StampError};
use crate::geometry::{self, PageExtent, ResolvedRect};
use crate::pipeline::{content, document, overlay};
use crate::sniff::ContentKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of one stamping run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampReport {
    /// Where the document was written.
    pub output: PathBuf,
    /// Whether the input document did not exist and was created.
    pub document_created: bool,
    /// 0-based index of the page that received the overlay.
    pub page_index: usize,
    /// Whether that page was appended by this run.
    pub page_created: bool,
    /// Page size (points) after orientation.
    pub page_extent: PageExtent,
    /// Rectangle in points, top-left origin; None when the spec was invalid.
    pub rect: Option<ResolvedRect>,
    /// Kind of content drawn; None when nothing was drawn.
    pub content_kind: Option<ContentKind>,
    /// Why the overlay was skipped, if it was.
    pub overlay_error: Option<OverlayError>,
    pub duration_ms: u64,
}

impl StampReport {
    /// `true` when content was drawn.
    pub fn overlay_applied(&self) -> bool {
        self.content_kind.is_some()
    }
}

/// Stamp `content` (if any) onto a page of `document` and write `output`.
///
/// `document` is created when it does not exist. `output` may equal
/// `document`.
///
/// # Errors
/// Returns `Err(StampError)` only when no output can be produced: pdfium is
/// unavailable, the document is corrupt or encrypted, the page index is out
/// of range, or the output cannot be written. Overlay problems are reported
/// in the returned [`StampReport`].
///
/// # Example
/// ```rust,no_run
/// use pdfstamp::{stamp, StampConfig};
/// use std::path::Path;
///
/// let config = StampConfig::builder().rect("1cm,1cm,50%,3cm").build()?;
/// let report = stamp(
///     Path::new("in.pdf"),
///     Some(Path::new("logo.png")),
///     Path::new("out.pdf"),
///     &config,
/// )?;
/// if let Some(err) = &report.overlay_error {
///     eprintln!("{err}");
/// }
/// # Ok::<(), pdfstamp::StampError>(())
/// ```
pub fn stamp(
    document_path: &Path,
    content_path: Option<&Path>,
    output: &Path,
    config: &StampConfig,
) -> Result<StampReport, StampError> {
    let start = Instant::now();
    info!("Stamping {}", document_path.display());

    // ── Step 1: Open document and page ───────────────────────────────────
    let pdfium = document::pdfium()?;
    let (mut pdf, document_created) = document::open_or_create(pdfium, document_path)?;
    let page = document::prepare_page(&mut pdf, config)?;

    // ── Step 2: Resolve geometry ─────────────────────────────────────────
    let rect = match config.rect.as_deref() {
        Some(spec) => geometry::resolve(spec, page.extent),
        None => Ok(config.default_rect),
    };
    if let Ok(r) = &rect {
        debug!("Resolved rectangle: {:?}", r);
    }

    // ── Step 3: Overlay ──────────────────────────────────────────────────
    let overlay_result = match (&rect, content_path) {
        (Err(e), _) => Err(e.clone()),
        (Ok(_), None) => Ok(None),
        (Ok(r), Some(path)) => content::load_content(path, config.content_kind).and_then(|c| {
            overlay::draw(&mut pdf, page.index, page.extent, *r, &c, config)?;
            Ok(Some(c.kind))
        }),
    };

    let (content_kind, overlay_error) = match overlay_result {
        Ok(kind) => (kind, None),
        Err(e) => {
            warn!("Overlay skipped: {}", e);
            (None, Some(e))
        }
    };

    // ── Step 4: Save ─────────────────────────────────────────────────────
    document::save(pdf, output)?;

    let report = StampReport {
        output: output.to_path_buf(),
        document_created,
        page_index: page.index,
        page_created: page.created,
        page_extent: page.extent,
        rect: rect.ok(),
        content_kind,
        overlay_error,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Stamp complete: page {}, overlay {}, {}ms",
        report.page_index,
        if report.overlay_applied() { "applied" } else { "skipped" },
        report.duration_ms
    );
    Ok(report)
}
