//! Content sniffing: classify an opaque byte stream by its leading bytes.
//!
//! Only three fixed signatures are recognised. Anything else, including a
//! stream too short to hold a full signature, is [`ContentKind::Undefined`],
//! which callers treat as "ask the user" rather than as a failure.
//!
//! ## Known limitation: BOM-only text detection
//!
//! UTF-8 text is recognised solely by its byte-order mark (`EF BB BF`).
//! Plenty of valid UTF-8 files have no BOM; those classify as `Undefined`
//! and need an explicit `-t text_utf8`. Likewise only JFIF JPEGs
//! (`FF D8 FF E0`) are recognised; EXIF JPEGs (`FF D8 FF E1`) are not.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

/// What kind of content an input stream holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// No known signature matched. (default)
    #[default]
    Undefined,
    /// UTF-8 text starting with a byte-order mark.
    TextUtf8,
    /// PNG image.
    ImagePng,
    /// JPEG (JFIF) image.
    ImageJpeg,
}

impl ContentKind {
    /// `true` for the two raster image kinds.
    pub fn is_image(self) -> bool {
        matches!(self, ContentKind::ImagePng | ContentKind::ImageJpeg)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Undefined => "undefined",
            ContentKind::TextUtf8 => "text_utf8",
            ContentKind::ImagePng => "image_png",
            ContentKind::ImageJpeg => "image_jpeg",
        };
        f.write_str(name)
    }
}

/// Byte-order mark that prefixes UTF-8 text.
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Signatures in priority order. First match wins.
const SIGNATURES: &[(&[u8], ContentKind)] = &[
    (&[0xFF, 0xD8, 0xFF, 0xE0], ContentKind::ImageJpeg),
    (
        &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
        ContentKind::ImagePng,
    ),
    (UTF8_BOM, ContentKind::TextUtf8),
];

/// Length of the longest signature; the most bytes [`classify`] ever reads.
const MAX_SIGNATURE_LEN: usize = {
    let mut max = 0;
    let mut i = 0;
    while i < SIGNATURES.len() {
        if SIGNATURES[i].0.len() > max {
            max = SIGNATURES[i].0.len();
        }
        i += 1;
    }
    max
};

/// Classify an in-memory buffer by its leading bytes.
pub fn classify_bytes(bytes: &[u8]) -> ContentKind {
    SIGNATURES
        .iter()
        .find(|(signature, _)| bytes.starts_with(signature))
        .map(|&(_, kind)| kind)
        .unwrap_or(ContentKind::Undefined)
}

/// Classify a stream without consuming it.
///
/// Reads at most as many bytes as the longest signature, then
/// seeks back to where the stream was. Never fails: I/O errors are logged
/// and reported as [`ContentKind::Undefined`]. The stream is not closed.
pub fn classify<R: Read + Seek>(stream: &mut R) -> ContentKind {
    let start = match stream.stream_position() {
        Ok(pos) => pos,
        Err(e) => {
            debug!("Cannot query stream position, treating content as undefined: {}", e);
            return ContentKind::Undefined;
        }
    };

    let mut header = Vec::with_capacity(MAX_SIGNATURE_LEN);
    let read = stream
        .by_ref()
        .take(MAX_SIGNATURE_LEN as u64)
        .read_to_end(&mut header);

    if let Err(e) = stream.seek(SeekFrom::Start(start)) {
        debug!("Cannot rewind stream after sniffing: {}", e);
        return ContentKind::Undefined;
    }

    match read {
        Ok(_) => {
            let kind = classify_bytes(&header);
            debug!("Sniffed {} header bytes → {}", header.len(), kind);
            kind
        }
        Err(e) => {
            debug!("Failed to read stream header: {}", e);
            ContentKind::Undefined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn classify_vec(bytes: Vec<u8>) -> (ContentKind, u64) {
        let mut cursor = Cursor::new(bytes);
        let kind = classify(&mut cursor);
        (kind, cursor.position())
    }

    #[test]
    fn detects_jpeg() {
        let (kind, pos) = classify_vec(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F']);
        assert_eq!(kind, ContentKind::ImageJpeg);
        assert_eq!(pos, 0);
    }

    #[test]
    fn detects_png() {
        let mut bytes = PNG_HEADER.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 13, b'I', b'H', b'D', b'R']);
        let (kind, pos) = classify_vec(bytes);
        assert_eq!(kind, ContentKind::ImagePng);
        assert_eq!(pos, 0);
    }

    #[test]
    fn detects_bom_text() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("Grüße".as_bytes());
        assert_eq!(classify_vec(bytes).0, ContentKind::TextUtf8);
    }

    #[test]
    fn bom_only_stream_is_text() {
        assert_eq!(classify_vec(UTF8_BOM.to_vec()).0, ContentKind::TextUtf8);
    }

    #[test]
    fn text_without_bom_is_undefined() {
        assert_eq!(
            classify_vec(b"plain ascii text".to_vec()).0,
            ContentKind::Undefined
        );
    }

    #[test]
    fn truncated_jpeg_signature_is_undefined() {
        let (kind, pos) = classify_vec(vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(kind, ContentKind::Undefined);
        assert_eq!(pos, 0);
    }

    #[test]
    fn exif_jpeg_is_undefined() {
        assert_eq!(
            classify_vec(vec![0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x00]).0,
            ContentKind::Undefined
        );
    }

    #[test]
    fn truncated_png_signature_is_undefined() {
        assert_eq!(
            classify_vec(PNG_HEADER[..7].to_vec()).0,
            ContentKind::Undefined
        );
    }

    #[test]
    fn short_streams_are_undefined_and_unmoved() {
        for len in 0..4 {
            let (kind, pos) = classify_vec(vec![0xFF; len]);
            assert_eq!(kind, ContentKind::Undefined, "len={len}");
            assert_eq!(pos, 0, "len={len}");
        }
    }

    #[test]
    fn header_read_covers_every_signature() {
        assert_eq!(MAX_SIGNATURE_LEN, PNG_HEADER.len());
        for (signature, kind) in SIGNATURES {
            assert!(signature.len() <= MAX_SIGNATURE_LEN, "{kind} signature is cut short");
        }
    }

    #[test]
    fn classify_is_idempotent() {
        let mut cursor = Cursor::new(PNG_HEADER.to_vec());
        let first = classify(&mut cursor);
        let first_pos = cursor.position();
        let second = classify(&mut cursor);
        assert_eq!(first, second);
        assert_eq!(first_pos, cursor.position());
    }

    #[test]
    fn restores_non_zero_start_position() {
        let mut bytes = vec![0u8; 5];
        bytes.extend_from_slice(&PNG_HEADER);
        let mut cursor = Cursor::new(bytes);
        cursor.set_position(5);
        assert_eq!(classify(&mut cursor), ContentKind::ImagePng);
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn stream_is_still_readable_after_classify() {
        let mut cursor = Cursor::new(vec![0xEF, 0xBB, 0xBF, b'h', b'i']);
        classify(&mut cursor);
        let mut all = Vec::new();
        cursor.read_to_end(&mut all).unwrap();
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn display_matches_serde_names() {
        for kind in [
            ContentKind::Undefined,
            ContentKind::TextUtf8,
            ContentKind::ImagePng,
            ContentKind::ImageJpeg,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
