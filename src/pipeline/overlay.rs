//! Drawing: place text or an image into a page rectangle.
//!
//! Rectangles arrive with a top-left origin; PDF user space has its origin
//! at the media box's bottom-left corner with y growing upward, and that
//! corner need not be (0, 0). [`to_pdf_space`] does the flip and the shift.
//!
//! Text is laid out one object per line. Each line is centred horizontally
//! in the rectangle and the block of lines is centred vertically, so a zero
//! rectangle centres the text on its corner point. Images are scaled to
//! exactly fill the rectangle.

use crate::config::{BuiltinFont, StampConfig};
use crate::error::OverlayError;
use crate::geometry::{PageExtent, ResolvedRect};
use crate::pipeline::content::Content;
use crate::sniff::ContentKind;
use pdfium_render::prelude::*;
use tracing::{debug, warn};

/// A rectangle in PDF user space: `(left, bottom)` plus size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfSpaceRect {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

/// Flip a top-left-origin rectangle into PDF user space for a page whose
/// media box has its lower-left corner at `origin`.
pub fn to_pdf_space(rect: ResolvedRect, page: PageExtent, origin: (f64, f64)) -> PdfSpaceRect {
    let (origin_x, origin_y) = origin;
    PdfSpaceRect {
        left: origin_x + rect.x,
        bottom: origin_y + page.height - rect.y - rect.height,
        width: rect.width,
        height: rect.height,
    }
}

/// Baseline y (PDF space) of each of `lines` text lines, top line first,
/// for a block centred vertically on `center_y`.
///
/// Baselines sit a third of the font size below each line's centre, which
/// is close enough to the visual middle of Latin capitals and lowercase.
pub fn line_baselines(
    lines: usize,
    center_y: f64,
    font_size: f64,
    line_spacing: f64,
) -> Vec<f64> {
    let pitch = font_size * line_spacing;
    let first_center = center_y + pitch * (lines.saturating_sub(1) as f64) / 2.0;
    (0..lines)
        .map(|i| first_center - pitch * i as f64 - font_size / 3.0)
        .collect()
}

/// Draw `content` into `rect` on page `page_index`.
pub fn draw(
    document: &mut PdfDocument<'_>,
    page_index: usize,
    page: PageExtent,
    rect: ResolvedRect,
    content: &Content,
    config: &StampConfig,
) -> Result<(), OverlayError> {
    if rect.is_degenerate() {
        warn!(
            "Overlay rectangle {:?} has no area; pass a rectangle to size the content",
            rect
        );
    }
    let target = to_pdf_space(rect, page, media_origin(document, page_index)?);

    match content.kind {
        ContentKind::TextUtf8 => draw_text(document, page_index, target, &content.text(), config),
        ContentKind::ImagePng | ContentKind::ImageJpeg => {
            draw_image(document, page_index, target, content)
        }
        ContentKind::Undefined => Err(OverlayError::RenderFailed {
            page: page_index,
            detail: "content kind is undefined".into(),
        }),
    }
}

fn render_failed(page: usize) -> impl Fn(PdfiumError) -> OverlayError {
    move |e| OverlayError::RenderFailed {
        page,
        detail: format!("{:?}", e),
    }
}

/// Lower-left corner of the page's media box.
pub fn media_origin(
    document: &PdfDocument<'_>,
    page_index: usize,
) -> Result<(f64, f64), OverlayError> {
    let media = document
        .pages()
        .get(page_index as PdfPageIndex)
        .and_then(|page| page.boundaries().media())
        .map_err(render_failed(page_index))?;
    Ok((media.bounds.left.value as f64, media.bounds.bottom.value as f64))
}

fn builtin_font(fonts: &mut PdfFonts<'_>, font: BuiltinFont) -> PdfFontToken {
    match font {
        BuiltinFont::Helvetica => fonts.helvetica(),
        BuiltinFont::TimesRoman => fonts.times_roman(),
        BuiltinFont::Courier => fonts.courier(),
    }
}

fn draw_text(
    document: &mut PdfDocument<'_>,
    page_index: usize,
    target: PdfSpaceRect,
    text: &str,
    config: &StampConfig,
) -> Result<(), OverlayError> {
    let font = builtin_font(document.fonts_mut(), config.font);
    let font_size = config.font_size as f64;

    let lines: Vec<&str> = text.lines().collect();
    let center_x = target.left + target.width / 2.0;
    let center_y = target.bottom + target.height / 2.0;
    let baselines = line_baselines(lines.len(), center_y, font_size, config.line_spacing as f64);

    let mut page = document
        .pages()
        .get(page_index as PdfPageIndex)
        .map_err(render_failed(page_index))?;

    for (line, baseline) in lines.iter().zip(baselines) {
        if line.trim().is_empty() {
            continue;
        }
        let mut object = page
            .objects_mut()
            .create_text_object(
                PdfPoints::new(center_x as f32),
                PdfPoints::new(baseline as f32),
                *line,
                font,
                PdfPoints::new(config.font_size),
            )
            .map_err(render_failed(page_index))?;

        let width = object.width().map_err(render_failed(page_index))?;
        object
            .translate(PdfPoints::new(-width.value / 2.0), PdfPoints::new(0.0))
            .map_err(render_failed(page_index))?;
    }

    page.regenerate_content().map_err(render_failed(page_index))?;
    debug!("Drew {} text line(s) on page {}", lines.len(), page_index);
    Ok(())
}

fn draw_image(
    document: &mut PdfDocument<'_>,
    page_index: usize,
    target: PdfSpaceRect,
    content: &Content,
) -> Result<(), OverlayError> {
    let image = image::load_from_memory(&content.bytes).map_err(|e| OverlayError::ImageDecode {
        kind: content.kind.to_string(),
        detail: e.to_string(),
    })?;
    debug!("Decoded {}×{} px {}", image.width(), image.height(), content.kind);

    let mut page = document
        .pages()
        .get(page_index as PdfPageIndex)
        .map_err(render_failed(page_index))?;

    page.objects_mut()
        .create_image_object(
            PdfPoints::new(target.left as f32),
            PdfPoints::new(target.bottom as f32),
            &image,
            Some(PdfPoints::new(target.width as f32)),
            Some(PdfPoints::new(target.height as f32)),
        )
        .map_err(render_failed(page_index))?;

    page.regenerate_content().map_err(render_failed(page_index))?;
    debug!("Drew image on page {}", page_index);
    Ok(())
}
