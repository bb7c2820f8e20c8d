//! Geometry resolution: turn a user rectangle spec into page coordinates.
//!
//! A spec is four comma-separated fields, `x,y,width,height`. Each field is
//! independently one of:
//!
//! | Form      | Meaning                                              |
//! |-----------|------------------------------------------------------|
//! | `72`      | absolute PDF points (1/72 inch)                      |
//! | `2.5cm`   | centimetres                                          |
//! | `25mm`    | millimetres                                          |
//! | `10%`     | percent of page width (x, width) or height (y, height) |
//!
//! Coordinates use a top-left origin with y growing downward; the overlay
//! stage maps them onto PDF user space.
//!
//! Resolution runs in two stages. A spec made of four plain numbers is
//! accepted directly; anything else falls through to the suffix-aware
//! per-field resolver. Both stages agree on plain-number input.

use crate::error::OverlayError;
use serde::{Deserialize, Serialize};

/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Points per centimetre.
pub const POINTS_PER_CM: f64 = POINTS_PER_INCH / 2.54;

/// Points per millimetre.
pub const POINTS_PER_MM: f64 = POINTS_PER_INCH / 25.4;

/// Width and height of a page in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageExtent {
    pub width: f64,
    pub height: f64,
}

impl PageExtent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// ISO A4 portrait, 595 × 842 pt.
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// The same extent with width and height exchanged.
    pub fn swapped(self) -> Self {
        Self::new(self.height, self.width)
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// A rectangle in points, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ResolvedRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The zero rectangle used when no spec is given.
    pub fn zero() -> Self {
        Self::default()
    }

    /// `true` when the rectangle has no area.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Which page dimension a percentage field scales against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// x and width run horizontally; y and height vertically.
const FIELD_AXES: [Axis; 4] = [
    Axis::Horizontal,
    Axis::Vertical,
    Axis::Horizontal,
    Axis::Vertical,
];

/// Resolve a rectangle spec against a page.
///
/// # Errors
/// [`OverlayError::Format`] when the spec does not have exactly four fields,
/// or when any field is not a finite number once its suffix is stripped.
/// The error carries the offending field (or the whole spec for a bad field
/// count).
///
/// # Example
/// ```rust
/// use pdfstamp::geometry::{resolve, PageExtent};
///
/// let page = PageExtent::new(600.0, 800.0);
/// let rect = resolve("10%,10%,80%,2.54cm", page).unwrap();
/// assert_eq!((rect.x, rect.y, rect.width), (60.0, 80.0, 480.0));
/// assert!((rect.height - 72.0).abs() < 1e-9);
/// ```
pub fn resolve(spec: &str, page: PageExtent) -> Result<ResolvedRect, OverlayError> {
    match parse_plain_quad(spec) {
        Some(rect) => Ok(rect),
        None => resolve_fields(spec, page),
    }
}

/// Strict stage: four plain finite numbers, nothing else.
fn parse_plain_quad(spec: &str) -> Option<ResolvedRect> {
    let mut values = [0.0f64; 4];
    let mut fields = spec.split(',');
    for slot in values.iter_mut() {
        let v: f64 = fields.next()?.trim().parse().ok()?;
        if !v.is_finite() {
            return None;
        }
        *slot = v;
    }
    if fields.next().is_some() {
        return None;
    }
    let [x, y, width, height] = values;
    Some(ResolvedRect::new(x, y, width, height))
}

/// Suffix-aware stage: each field resolved on its own axis.
fn resolve_fields(spec: &str, page: PageExtent) -> Result<ResolvedRect, OverlayError> {
    let fields: Vec<&str> = spec.split(',').collect();
    if fields.len() != FIELD_AXES.len() {
        return Err(OverlayError::format(
            spec,
            format!("expected 4 comma-separated fields, got {}", fields.len()),
        ));
    }

    let mut values = [0.0f64; 4];
    for ((slot, field), axis) in values.iter_mut().zip(&fields).zip(FIELD_AXES) {
        *slot = resolve_field(field, axis, page)?;
    }
    let [x, y, width, height] = values;
    Ok(ResolvedRect::new(x, y, width, height))
}

fn resolve_field(field: &str, axis: Axis, page: PageExtent) -> Result<f64, OverlayError> {
    let text = field.trim();

    let value = if let Some(number) = text.strip_suffix('%') {
        page.along(axis) / 100.0 * parse_number(field, number)?
    } else if let Some(number) = text.strip_suffix("cm") {
        parse_number(field, number)? * POINTS_PER_CM
    } else if let Some(number) = text.strip_suffix("mm") {
        parse_number(field, number)? * POINTS_PER_MM
    } else {
        parse_number(field, text)?
    };

    if !value.is_finite() {
        return Err(OverlayError::format(field, "value is out of range"));
    }
    Ok(value)
}

fn parse_number(field: &str, number: &str) -> Result<f64, OverlayError> {
    let number = number.trim();
    if number.is_empty() {
        return Err(OverlayError::format(field, "missing number"));
    }
    let value: f64 = number
        .parse()
        .map_err(|_| OverlayError::format(field, format!("'{number}' is not a number")))?;
    if !value.is_finite() {
        return Err(OverlayError::format(field, "value must be finite"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn page() -> PageExtent {
        PageExtent::new(595.0, 842.0)
    }

    fn assert_rect(actual: ResolvedRect, expected: (f64, f64, f64, f64)) {
        let (x, y, w, h) = expected;
        assert!((actual.x - x).abs() < EPS, "x: {actual:?} vs {expected:?}");
        assert!((actual.y - y).abs() < EPS, "y: {actual:?} vs {expected:?}");
        assert!((actual.width - w).abs() < EPS, "w: {actual:?} vs {expected:?}");
        assert!((actual.height - h).abs() < EPS, "h: {actual:?} vs {expected:?}");
    }

    fn format_field(result: Result<ResolvedRect, OverlayError>) -> String {
        match result {
            Err(OverlayError::Format { field, .. }) => field,
            other => panic!("expected a format error, got {other:?}"),
        }
    }

    #[test]
    fn plain_numbers_are_absolute() {
        assert_rect(
            resolve("10,20,300,40.5", page()).unwrap(),
            (10.0, 20.0, 300.0, 40.5),
        );
    }

    #[test]
    fn plain_numbers_tolerate_whitespace() {
        assert_rect(
            resolve(" 1, 2 ,3 , 4 ", page()).unwrap(),
            (1.0, 2.0, 3.0, 4.0),
        );
    }

    #[test]
    fn half_percentages_are_half_the_page() {
        for p in [page(), PageExtent::new(100.0, 50.0), PageExtent::new(1.0, 3.0)] {
            assert_rect(
                resolve("50%,50%,50%,50%", p).unwrap(),
                (p.width / 2.0, p.height / 2.0, p.width / 2.0, p.height / 2.0),
            );
        }
    }

    #[test]
    fn percentages_use_the_right_axis() {
        let p = PageExtent::new(200.0, 1000.0);
        assert_rect(
            resolve("10%,10%,80%,30%", p).unwrap(),
            (20.0, 100.0, 160.0, 300.0),
        );
    }

    #[test]
    fn one_centimetre_ignores_page_size() {
        for p in [page(), PageExtent::new(10.0, 10.0)] {
            let cm = POINTS_PER_CM;
            assert_rect(resolve("1cm,1cm,1cm,1cm", p).unwrap(), (cm, cm, cm, cm));
        }
    }

    #[test]
    fn inch_in_metric_units_is_72_points() {
        assert_rect(
            resolve("2.54cm,25.4mm,0cm,0mm", page()).unwrap(),
            (72.0, 72.0, 0.0, 0.0),
        );
    }

    #[test]
    fn mixed_units() {
        let p = PageExtent::new(500.0, 700.0);
        assert_rect(
            resolve("10mm,10%,100,5cm", p).unwrap(),
            (10.0 * POINTS_PER_MM, 70.0, 100.0, 5.0 * POINTS_PER_CM),
        );
    }

    #[test]
    fn negative_values_are_accepted() {
        assert_rect(
            resolve("-1cm,-10%,5,5", PageExtent::new(100.0, 100.0)).unwrap(),
            (-POINTS_PER_CM, -10.0, 5.0, 5.0),
        );
    }

    #[test]
    fn plain_number_round_trip_is_exact() {
        let values = [12.345678901234567, 0.1, 595.2755905511812, 1e-7];
        let spec = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let rect = resolve(&spec, page()).unwrap();
        assert_eq!([rect.x, rect.y, rect.width, rect.height], values);
    }

    #[test]
    fn too_few_fields_is_a_format_error() {
        for spec in ["", "1", "1,2", "1cm,2cm,3%"] {
            assert_eq!(format_field(resolve(spec, page())), spec);
        }
    }

    #[test]
    fn too_many_fields_is_a_format_error() {
        assert_eq!(format_field(resolve("1,2,3,4,5", page())), "1,2,3,4,5");
    }

    #[test]
    fn non_numeric_field_is_reported() {
        assert_eq!(format_field(resolve("1,2,abc,4", page())), "abc");
        assert_eq!(format_field(resolve("1,2,3,4in", page())), "4in");
    }

    #[test]
    fn embedded_percent_is_rejected() {
        assert_eq!(format_field(resolve("5%0,1,1,1", page())), "5%0");
        assert_eq!(format_field(resolve("1,5%%,1,1", page())), "5%%");
    }

    #[test]
    fn bare_suffix_is_rejected() {
        assert_eq!(format_field(resolve("%,1,1,1", page())), "%");
        assert_eq!(format_field(resolve("1,cm,1,1", page())), "cm");
    }

    #[test]
    fn empty_field_is_rejected() {
        assert_eq!(format_field(resolve("1,,1,1", page())), "");
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_eq!(format_field(resolve("inf,1,1,1", page())), "inf");
        assert_eq!(format_field(resolve("1,NaN,1,1", page())), "NaN");
        assert_eq!(format_field(resolve("1,1,infcm,1", page())), "infcm");
    }

    #[test]
    fn huge_percentage_scales_page_first() {
        let rect = resolve("2e307%,1,1,1", page()).unwrap();
        assert!(rect.x.is_finite());
        assert!((rect.x / 1.19e308 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn overflowing_percentage_is_rejected() {
        assert!(resolve("1e308%,1,1,1", PageExtent::new(1e308, 1.0)).is_err());
    }

    #[test]
    fn rect_helpers() {
        assert!(ResolvedRect::zero().is_degenerate());
        let r = ResolvedRect::new(10.0, 20.0, 100.0, 40.0);
        assert!(!r.is_degenerate());
        assert_eq!(r.center(), (60.0, 40.0));
        assert!(PageExtent::a4().swapped().is_landscape());
    }
}
