//! Configuration types for a stamping run.
//!
//! Everything a run needs besides the file paths lives in [`StampConfig`],
//! built via [`StampConfigBuilder`]. The implicit defaults of a stamping tool
//! (zero rectangle, 20 pt Helvetica, A4 pages) are named fields here rather
//! than literals buried in the drawing code, so tests and library callers can
//! override any of them.

use crate::error::StampError;
use crate::geometry::{PageExtent, ResolvedRect};
use crate::sniff::ContentKind;
use serde::{Deserialize, Serialize};

/// Configuration for one stamping run.
///
/// Built via [`StampConfig::builder()`] or using [`StampConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfstamp::{PageTarget, StampConfig};
///
/// let config = StampConfig::builder()
///     .page(PageTarget::Index(0))
///     .rect("10%,10%,80%,20%")
///     .font_size(32.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampConfig {
    /// Page to draw on. Default: [`PageTarget::Append`].
    pub page: PageTarget,

    /// Force the target page into this orientation. Default: None (leave as is).
    ///
    /// A page whose aspect already matches is untouched; otherwise its media
    /// box is swapped, so the page extent used for percentage fields is the
    /// oriented one.
    pub orientation: Option<Orientation>,

    /// Content kind override. Default: [`ContentKind::Undefined`], meaning
    /// the content file is sniffed.
    pub content_kind: ContentKind,

    /// Raw rectangle spec, e.g. `"1cm,1cm,50%,3cm"`. Default: None.
    pub rect: Option<String>,

    /// Rectangle used when `rect` is None. Default: the zero rectangle.
    ///
    /// A zero rectangle is valid: text is drawn centred on the top-left
    /// corner of the page and images collapse to nothing.
    pub default_rect: ResolvedRect,

    /// Font for text content. Default: [`BuiltinFont::Helvetica`].
    pub font: BuiltinFont,

    /// Font size in points. Default: 20.
    pub font_size: f32,

    /// Baseline-to-baseline distance as a multiple of `font_size`. Default: 1.2.
    pub line_spacing: f32,

    /// Size of pages the tool creates (new documents, appended pages).
    /// Default: A4 portrait.
    pub new_page_size: PageExtent,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            page: PageTarget::default(),
            orientation: None,
            content_kind: ContentKind::Undefined,
            rect: None,
            default_rect: ResolvedRect::zero(),
            font: BuiltinFont::default(),
            font_size: 20.0,
            line_spacing: 1.2,
            new_page_size: PageExtent::a4(),
        }
    }
}

impl StampConfig {
    /// Create a new builder for `StampConfig`.
    pub fn builder() -> StampConfigBuilder {
        StampConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`StampConfig`].
#[derive(Debug)]
pub struct StampConfigBuilder {
    config: StampConfig,
}

impl StampConfigBuilder {
    pub fn page(mut self, page: PageTarget) -> Self {
        self.config.page = page;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.config.orientation = Some(orientation);
        self
    }

    pub fn content_kind(mut self, kind: ContentKind) -> Self {
        self.config.content_kind = kind;
        self
    }

    pub fn rect(mut self, spec: impl Into<String>) -> Self {
        self.config.rect = Some(spec.into());
        self
    }

    pub fn default_rect(mut self, rect: ResolvedRect) -> Self {
        self.config.default_rect = rect;
        self
    }

    pub fn font(mut self, font: BuiltinFont) -> Self {
        self.config.font = font;
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.config.font_size = size;
        self
    }

    pub fn line_spacing(mut self, spacing: f32) -> Self {
        self.config.line_spacing = spacing;
        self
    }

    pub fn new_page_size(mut self, extent: PageExtent) -> Self {
        self.config.new_page_size = extent;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<StampConfig, StampError> {
        let c = &self.config;
        if !(c.font_size.is_finite() && c.font_size > 0.0) {
            return Err(StampError::InvalidConfig(format!(
                "Font size must be a positive number, got {}",
                c.font_size
            )));
        }
        if !(c.line_spacing.is_finite() && c.line_spacing > 0.0) {
            return Err(StampError::InvalidConfig(format!(
                "Line spacing must be a positive number, got {}",
                c.line_spacing
            )));
        }
        let size = c.new_page_size;
        if !(size.width.is_finite() && size.height.is_finite())
            || size.width <= 0.0
            || size.height <= 0.0
        {
            return Err(StampError::InvalidConfig(format!(
                "New page size must be positive, got {}×{}",
                size.width, size.height
            )));
        }
        let r = c.default_rect;
        if ![r.x, r.y, r.width, r.height].iter().all(|v| v.is_finite()) {
            return Err(StampError::InvalidConfig(
                "Default rectangle must be finite".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which page receives the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageTarget {
    /// Add a new page at the end of the document. (default)
    #[default]
    Append,
    /// An existing page, 0-indexed.
    Index(usize),
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Reshape `extent` to this orientation, swapping sides if needed.
    pub fn apply(self, extent: PageExtent) -> PageExtent {
        match self {
            Orientation::Landscape if extent.width < extent.height => extent.swapped(),
            Orientation::Portrait if extent.width > extent.height => extent.swapped(),
            _ => extent,
        }
    }
}

/// PDF standard-14 fonts usable without embedding.
///
/// Helvetica is metrically compatible with Arial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinFont {
    #[default]
    Helvetica,
    TimesRoman,
    Courier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_explicit() {
        let c = StampConfig::default();
        assert_eq!(c.page, PageTarget::Append);
        assert_eq!(c.content_kind, ContentKind::Undefined);
        assert!(c.rect.is_none());
        assert_eq!(c.default_rect, ResolvedRect::zero());
        assert_eq!(c.font, BuiltinFont::Helvetica);
        assert_eq!(c.font_size, 20.0);
        assert_eq!(c.new_page_size, PageExtent::a4());
    }

    #[test]
    fn builder_sets_fields() {
        let c = StampConfig::builder()
            .page(PageTarget::Index(2))
            .orientation(Orientation::Landscape)
            .content_kind(ContentKind::ImagePng)
            .rect("1,2,3,4")
            .font(BuiltinFont::Courier)
            .font_size(11.0)
            .build()
            .unwrap();
        assert_eq!(c.page, PageTarget::Index(2));
        assert_eq!(c.orientation, Some(Orientation::Landscape));
        assert_eq!(c.content_kind, ContentKind::ImagePng);
        assert_eq!(c.rect.as_deref(), Some("1,2,3,4"));
        assert_eq!(c.font, BuiltinFont::Courier);
    }

    #[test]
    fn builder_rejects_bad_font_size() {
        for size in [0.0, -3.0, f32::NAN] {
            let err = StampConfig::builder().font_size(size).build().unwrap_err();
            assert!(matches!(err, StampError::InvalidConfig(_)), "size={size}");
        }
    }

    #[test]
    fn builder_rejects_bad_page_size() {
        let err = StampConfig::builder()
            .new_page_size(PageExtent::new(0.0, 842.0))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("New page size"));
    }

    #[test]
    fn builder_rejects_non_finite_default_rect() {
        let err = StampConfig::builder()
            .default_rect(ResolvedRect::new(f64::INFINITY, 0.0, 0.0, 0.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, StampError::InvalidConfig(_)));
    }

    #[test]
    fn orientation_swaps_only_when_needed() {
        let a4 = PageExtent::a4();
        assert_eq!(Orientation::Portrait.apply(a4), a4);
        assert_eq!(Orientation::Landscape.apply(a4), a4.swapped());
        assert_eq!(Orientation::Landscape.apply(a4.swapped()), a4.swapped());
        let square = PageExtent::new(100.0, 100.0);
        assert_eq!(Orientation::Landscape.apply(square), square);
    }
}
