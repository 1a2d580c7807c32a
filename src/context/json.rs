//! JSON body encoding
//!
//! Compact output with `<`, `>`, `&`, U+2028 and U+2029 written as `\u`
//! escapes, so a body can be embedded in an HTML page unchanged.

use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter};
use std::io;

struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            let escaped = match ch {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(&fragment.as_bytes()[start..i])?;
            writer.write_all(escaped.as_bytes())?;
            start = i + ch.len_utf8();
        }
        CompactFormatter.write_string_fragment(writer, &fragment[start..])
    }
}

/// Encode `value` followed by a newline
pub fn encode<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut encoded = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut encoded, HtmlSafeFormatter);
    value.serialize(&mut serializer)?;
    encoded.push(b'\n');
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_markup_characters_are_escaped() {
        let body = encode(&json!({"a": "<b>&"})).unwrap();
        assert_eq!(body, b"{\"a\":\"\\u003cb\\u003e\\u0026\"}\n");
    }

    #[test]
    fn test_keys_and_separators_are_escaped() {
        let body = encode(&json!({"<k>": "line\u{2028}para\u{2029}"})).unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "{\"\\u003ck\\u003e\":\"line\\u2028para\\u2029\"}\n"
        );
    }

    #[test]
    fn test_plain_values_are_compact() {
        let body = encode(&json!({"Hello": "World", "ID": 1234, "quote": "\"é\""})).unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "{\"Hello\":\"World\",\"ID\":1234,\"quote\":\"\\\"é\\\"\"}\n"
        );
    }
}
