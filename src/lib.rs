//! # pdfstamp
//!
//! Overlay a piece of text or a raster image onto one page of a PDF,
//! positioned by a rectangle given in points, centimetres, millimetres or
//! percentages of the page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF + content file
//!  │
//!  ├─ 1. Document  open (or create) via pdfium, select or append the page
//!  ├─ 2. Geometry  resolve "x,y,w,h" against the page extent
//!  ├─ 3. Content   sniff PNG / JPEG / UTF-8 (BOM) unless a type is given
//!  ├─ 4. Overlay   draw centred text lines or a scaled image
//!  └─ 5. Save      atomic write, even when the overlay was skipped
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfstamp::{stamp, PageTarget, StampConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StampConfig::builder()
//!         .page(PageTarget::Index(0))
//!         .rect("10%,5%,80%,2cm")
//!         .build()?;
//!     let report = stamp(
//!         Path::new("report.pdf"),
//!         Some(Path::new("notice.txt")),
//!         Path::new("report-stamped.pdf"),
//!         &config,
//!     )?;
//!     println!("overlay applied: {}", report.overlay_applied());
//!     Ok(())
//! }
//! ```
//!
//! The two pure building blocks, [`sniff::classify`] and
//! [`geometry::resolve`], need no pdfium library and can be used alone.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfstamp` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod sniff;
pub mod stamp;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BuiltinFont, Orientation, PageTarget, StampConfig, StampConfigBuilder};
pub use error::{OverlayError, StampError};
pub use geometry::{resolve, PageExtent, ResolvedRect};
pub use sniff::{classify, classify_bytes, ContentKind};
pub use stamp::{stamp, StampReport};
