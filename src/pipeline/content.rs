//! Content loading: open the overlay file and decide what it is.
//!
//! The kind comes from the caller's override when one is given, otherwise
//! from [`crate::sniff::classify`] on the open file. Undetectable content is
//! an [`OverlayError::UnsupportedContent`]; we never fall back to a guess.

use crate::error::OverlayError;
use crate::sniff::{self, ContentKind, UTF8_BOM};
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// A content file, classified and fully read.
#[derive(Debug, Clone)]
pub struct Content {
    pub kind: ContentKind,
    pub bytes: Vec<u8>,
}

impl Content {
    /// The bytes as text: a leading BOM is dropped and invalid UTF-8
    /// sequences become U+FFFD.
    pub fn text(&self) -> Cow<'_, str> {
        decode_text(&self.bytes)
    }
}

/// Open `path`, classify it (unless `override_kind` is set) and read it.
pub fn load_content(path: &Path, override_kind: ContentKind) -> Result<Content, OverlayError> {
    let unreadable = |e: std::io::Error| OverlayError::ContentUnreadable {
        path: path.to_path_buf(),
        detail: e.to_string(),
    };

    let mut file = File::open(path).map_err(unreadable)?;

    let kind = match override_kind {
        ContentKind::Undefined => sniff::classify(&mut file),
        explicit => {
            debug!("Content type given explicitly: {}", explicit);
            explicit
        }
    };
    if kind == ContentKind::Undefined {
        return Err(OverlayError::UnsupportedContent {
            path: path.to_path_buf(),
        });
    }

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(unreadable)?;
    debug!("Loaded {} bytes of {} from {}", bytes.len(), kind, path.display());

    Ok(Content { kind, bytes })
}

/// Decode text content leniently.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_with(bytes: &[u8]) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(bytes).unwrap();
        f
    }

    #[test]
    fn sniffed_text_keeps_all_bytes() {
        let f = temp_with(b"\xEF\xBB\xBFHello");
        let content = load_content(f.path(), ContentKind::Undefined).unwrap();
        assert_eq!(content.kind, ContentKind::TextUtf8);
        assert_eq!(content.bytes.len(), 8);
        assert_eq!(content.text(), "Hello");
    }

    #[test]
    fn undetected_content_is_unsupported() {
        let f = temp_with(b"no bom here");
        let err = load_content(f.path(), ContentKind::Undefined).unwrap_err();
        assert!(matches!(err, OverlayError::UnsupportedContent { .. }));
    }

    #[test]
    fn override_skips_sniffing() {
        let f = temp_with(b"no bom here");
        let content = load_content(f.path(), ContentKind::TextUtf8).unwrap();
        assert_eq!(content.kind, ContentKind::TextUtf8);
        assert_eq!(content.text(), "no bom here");
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_content(&dir.path().join("absent.png"), ContentKind::Undefined)
            .unwrap_err();
        assert!(matches!(err, OverlayError::ContentUnreadable { .. }));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(decode_text(b"a\xFFb"), "a\u{FFFD}b");
    }
}
