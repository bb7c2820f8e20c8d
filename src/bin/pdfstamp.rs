//! CLI binary for pdfstamp.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `StampConfig` and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use pdfstamp::{stamp, BuiltinFont, ContentKind, Orientation, PageTarget, StampConfig, StampReport};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Append a page to report.pdf with a centred notice
  pdfstamp report.pdf -i notice.txt -r 10%,40%,80%,20%

  # Put a logo in the top-left corner of the first page, write a copy
  pdfstamp report.pdf -i logo.png -p 0 -r 1cm,1cm,4cm,2cm -o stamped.pdf

  # Text file without a byte-order mark: give the type explicitly
  pdfstamp report.pdf -i notes.txt -t text -r 0,0,100%,50%

  # New landscape document with an image filling the page
  pdfstamp poster.pdf -i photo.jpg -l landscape -r 0,0,100%,100%

RECTANGLES:
  x,y,width,height from the top-left corner of the page. Each field is
  points (72), centimetres (2.5cm), millimetres (25mm) or a percentage of
  the page width (x, width) or height (y, height), e.g. 10%.

CONTENT TYPES:
  Detected from the first bytes: PNG, JPEG (JFIF) and UTF-8 text that starts
  with a byte-order mark. Anything else needs -t.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  RUST_LOG                Log filter, overrides -v / -q
"#;

/// Overlay text or an image onto a page of a PDF.
#[derive(Parser, Debug)]
#[command(
    name = "pdfstamp",
    version,
    about = "Overlay text or an image onto a page of a PDF",
    long_about = "Overlay a text file or a PNG/JPEG image onto one page of a PDF document, \
placed by a rectangle in points, centimetres, millimetres or percentages of the page. \
The document is created if it does not exist, and is always written, even when the \
overlay cannot be applied.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF document to stamp (created if missing).
    document: PathBuf,

    /// Content file: text, PNG or JPEG.
    #[arg(short, long, env = "PDFSTAMP_INPUT")]
    input: Option<PathBuf>,

    /// Output PDF. Defaults to overwriting the document.
    #[arg(short, long, env = "PDFSTAMP_OUTPUT")]
    output: Option<PathBuf>,

    /// 0-based index of an existing page. Without it a new page is appended.
    #[arg(short, long, env = "PDFSTAMP_PAGE")]
    page: Option<usize>,

    /// Page orientation.
    #[arg(short = 'l', long, env = "PDFSTAMP_ORIENTATION", value_enum)]
    orientation: Option<OrientationArg>,

    /// Content type; skips detection.
    #[arg(short = 't', long = "type", env = "PDFSTAMP_TYPE", value_enum)]
    content_type: Option<ContentKindArg>,

    /// Rectangle x,y,width,height, e.g. 1cm,1cm,50%,3cm.
    #[arg(short, long, env = "PDFSTAMP_RECT", allow_hyphen_values = true)]
    rect: Option<String>,

    /// Font for text content.
    #[arg(long, env = "PDFSTAMP_FONT", value_enum, default_value = "helvetica")]
    font: FontArg,

    /// Font size in points.
    #[arg(long, env = "PDFSTAMP_FONT_SIZE", default_value_t = 20.0)]
    font_size: f32,

    /// Print the run report as JSON on stdout.
    #[arg(long, env = "PDFSTAMP_JSON")]
    json: bool,

    /// Verbose logging.
    #[arg(short, long, env = "PDFSTAMP_VERBOSE")]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long, env = "PDFSTAMP_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<OrientationArg> for Orientation {
    fn from(v: OrientationArg) -> Self {
        match v {
            OrientationArg::Portrait => Orientation::Portrait,
            OrientationArg::Landscape => Orientation::Landscape,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum ContentKindArg {
    /// Detect from the content (same as omitting -t).
    Undefined,
    #[value(name = "text_utf8", alias = "text")]
    TextUtf8,
    #[value(name = "image_png", alias = "png")]
    ImagePng,
    #[value(name = "image_jpeg", alias = "jpeg", alias = "jpg")]
    ImageJpeg,
}

impl From<ContentKindArg> for ContentKind {
    fn from(v: ContentKindArg) -> Self {
        match v {
            ContentKindArg::Undefined => ContentKind::Undefined,
            ContentKindArg::TextUtf8 => ContentKind::TextUtf8,
            ContentKindArg::ImagePng => ContentKind::ImagePng,
            ContentKindArg::ImageJpeg => ContentKind::ImageJpeg,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FontArg {
    Helvetica,
    TimesRoman,
    Courier,
}

impl From<FontArg> for BuiltinFont {
    fn from(v: FontArg) -> Self {
        match v {
            FontArg::Helvetica => BuiltinFont::Helvetica,
            FontArg::TimesRoman => BuiltinFont::TimesRoman,
            FontArg::Courier => BuiltinFont::Courier,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config & run ───────────────────────────────────────────────
    let config = build_config(&cli)?;
    let output = cli.output.clone().unwrap_or_else(|| cli.document.clone());

    let report = stamp(&cli.document, cli.input.as_deref(), &output, &config)
        .context("Stamping failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    } else {
        print_summary(&report, cli.quiet);
    }

    Ok(())
}

/// Map CLI args to `StampConfig`.
fn build_config(cli: &Cli) -> Result<StampConfig> {
    let mut builder = StampConfig::builder()
        .page(cli.page.map_or(PageTarget::Append, PageTarget::Index))
        .font(cli.font.clone().into())
        .font_size(cli.font_size);

    if let Some(ref orientation) = cli.orientation {
        builder = builder.orientation(orientation.clone().into());
    }
    if let Some(ref kind) = cli.content_type {
        builder = builder.content_kind(kind.clone().into());
    }
    if let Some(ref rect) = cli.rect {
        builder = builder.rect(rect.clone());
    }

    builder.build().context("Invalid configuration")
}

/// Human-readable result on stderr. Overlay errors are shown even in quiet
/// mode: the document was written, but not with what the user asked for.
fn print_summary(report: &StampReport, quiet: bool) {
    if let Some(ref err) = report.overlay_error {
        eprintln!("{}  {}", red("✗"), err);
    }
    if quiet {
        return;
    }

    let page = if report.page_created {
        format!("new page {}", report.page_index)
    } else {
        format!("page {}", report.page_index)
    };
    let what = match report.content_kind {
        Some(kind) => format!("{kind} overlay"),
        None => "no overlay".to_string(),
    };
    eprintln!(
        "{}  {}  {}  →  {}  {}",
        if report.overlay_error.is_none() {
            green("✔")
        } else {
            red("⚠")
        },
        what,
        page,
        bold(&report.output.display().to_string()),
        dim(&format!("{}ms", report.duration_ms)),
    );
}
