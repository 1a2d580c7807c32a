//! Content sniffing module
//!
//! Infers a Content-Type from the leading bytes of a response body when the
//! handler did not set one. Follows the WHATWG MIME sniffing table used by
//! standard HTTP servers: markup signatures first, then magic numbers, then
//! a plain-text check.

/// At most this many bytes are inspected
pub const SNIFF_LEN: usize = 512;

const HTML: &str = "text/html; charset=utf-8";
const TEXT_UTF8: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

/// Tags that mark a document as HTML when found after leading whitespace.
/// Matching is case-insensitive and the tag must end in a space or `>`.
const HTML_TAGS: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

/// Exact prefixes, checked in order after the markup signatures
const MAGIC_PREFIXES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"%!PS-Adobe-", "application/postscript"),
    // Byte order marks
    (b"\xFE\xFF", "text/plain; charset=utf-16be"),
    (b"\xFF\xFE", "text/plain; charset=utf-16le"),
    (b"\xEF\xBB\xBF", TEXT_UTF8),
    // Images
    (b"\x00\x00\x01\x00", "image/x-icon"),
    (b"\x00\x00\x02\x00", "image/x-icon"),
    (b"BM", "image/bmp"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    // Audio and video
    (b"ID3", "audio/mpeg"),
    (b"OggS\x00", "application/ogg"),
    (b"MThd\x00\x00\x00\x06", "audio/midi"),
    (b"\x1A\x45\xDF\xA3", "video/webm"),
    // Fonts
    (b"OTTO", "font/otf"),
    (b"\x00\x01\x00\x00", "font/ttf"),
    (b"wOFF", "font/woff"),
    (b"wOF2", "font/woff2"),
    // Archives
    (b"\x1F\x8B\x08", "application/x-gzip"),
    (b"PK\x03\x04", "application/zip"),
    (b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    (b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    (b"\x00asm", "application/wasm"),
];

/// RIFF/IFF containers: outer tag at 0..4, form type at 8..12
const CONTAINER_FORMS: &[(&[u8; 4], &[u8; 4], &str)] = &[
    (b"RIFF", b"WEBP", "image/webp"),
    (b"FORM", b"AIFF", "audio/aiff"),
    (b"RIFF", b"AVI ", "video/avi"),
    (b"RIFF", b"WAVE", "audio/wave"),
];

/// Detect the content type of `data`
///
/// # Examples
/// ```
/// use gomint::http::sniff::detect_content_type;
/// assert_eq!(detect_content_type(b"<h1>Hi</h1>\n"), "text/html; charset=utf-8");
/// assert_eq!(detect_content_type(b"Hello world\n"), "text/plain; charset=utf-8");
/// assert_eq!(detect_content_type(b"\xFF\xD8\xFF\xE0"), "image/jpeg");
/// ```
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    let trimmed = skip_whitespace(data);
    if HTML_TAGS.iter().any(|tag| matches_html_tag(trimmed, tag)) {
        return HTML;
    }
    if trimmed.starts_with(b"<?xml") {
        return "text/xml; charset=utf-8";
    }

    if let Some((_, content_type)) = MAGIC_PREFIXES
        .iter()
        .find(|(prefix, _)| data.starts_with(prefix))
    {
        return *content_type;
    }

    if data.len() >= 12 {
        if let Some((_, _, content_type)) = CONTAINER_FORMS
            .iter()
            .find(|(outer, form, _)| data[..4] == outer[..] && data[8..12] == form[..])
        {
            return *content_type;
        }
    }

    if is_mp4(data) {
        return "video/mp4";
    }

    if data.iter().any(|&b| is_binary_byte(b)) {
        OCTET_STREAM
    } else {
        TEXT_UTF8
    }
}

fn skip_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

fn matches_html_tag(data: &[u8], tag: &[u8]) -> bool {
    if data.len() <= tag.len() {
        return false;
    }
    let prefix_matches = data
        .iter()
        .zip(tag)
        .all(|(d, t)| d.to_ascii_uppercase() == *t);
    prefix_matches && matches!(data[tag.len()], b' ' | b'>')
}

/// ISO base media file with an `mp4*` brand
fn is_mp4(data: &[u8]) -> bool {
    if data.len() < 12 {
        return false;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < box_size || box_size % 4 != 0 || &data[4..8] != b"ftyp" {
        return false;
    }
    (8..box_size)
        .step_by(4)
        // Bytes 12..16 hold the minor version, not a brand
        .filter(|&offset| offset != 12)
        .any(|offset| data.get(offset..offset + 3) == Some(b"mp4".as_slice()))
}

/// Control bytes that never appear in text
const fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}
