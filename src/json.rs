//! HTML-safe JSON encoding.
//!
//! Messages travel to Telegram with `parse_mode=HTML`, so every JSON string
//! written by this crate escapes `<`, `>` and `&` (plus the U+2028/U+2029
//! line separators) as `\uXXXX` sequences. [`HtmlSafe`] wraps any
//! [`serde_json`] formatter to add that escaping; the `encode_*` helpers
//! write a value followed by a single newline.

use std::io::{self, Write};

use serde::Serialize;
use serde::ser::Error as _;
use serde_json::Serializer;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};

/// Formatter adapter escaping HTML-significant characters in strings.
#[derive(Clone, Debug, Default)]
pub struct HtmlSafe<F> {
    inner: F,
}

impl<F> HtmlSafe<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

fn html_escape(c: char) -> Option<&'static [u8]> {
    match c {
        '<' => Some(b"\\u003c"),
        '>' => Some(b"\\u003e"),
        '&' => Some(b"\\u0026"),
        '\u{2028}' => Some(b"\\u2028"),
        '\u{2029}' => Some(b"\\u2029"),
        _ => None,
    }
}

impl<F: Formatter> Formatter for HtmlSafe<F> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (idx, c) in fragment.char_indices() {
            let Some(escaped) = html_escape(c) else {
                continue;
            };
            if start < idx {
                self.inner
                    .write_string_fragment(writer, &fragment[start..idx])?;
            }
            writer.write_all(escaped)?;
            start = idx + c.len_utf8();
        }
        if start < fragment.len() {
            self.inner.write_string_fragment(writer, &fragment[start..])?;
        }
        Ok(())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_object_value(writer)
    }
}

fn encode_with<W, F, T>(mut writer: W, formatter: F, value: &T) -> serde_json::Result<()>
where
    W: Write,
    F: Formatter,
    T: ?Sized + Serialize,
{
    let mut ser = Serializer::with_formatter(&mut writer, HtmlSafe::new(formatter));
    value.serialize(&mut ser)?;
    writer.write_all(b"\n").map_err(serde_json::Error::custom)
}

/// Write `value` as compact HTML-safe JSON followed by a newline.
pub fn encode_compact<W, T>(writer: W, value: &T) -> serde_json::Result<()>
where
    W: Write,
    T: ?Sized + Serialize,
{
    encode_with(writer, CompactFormatter, value)
}

/// Write `value` as tab-indented HTML-safe JSON followed by a newline.
pub fn encode_indented<W, T>(writer: W, value: &T) -> serde_json::Result<()>
where
    W: Write,
    T: ?Sized + Serialize,
{
    encode_with(writer, PrettyFormatter::with_indent(b"\t"), value)
}

/// Tab-indented HTML-safe JSON without the trailing newline.
pub fn to_string_indented<T>(value: &T) -> serde_json::Result<String>
where
    T: ?Sized + Serialize,
{
    let mut out = Vec::new();
    encode_indented(&mut out, value)?;
    out.pop();
    String::from_utf8(out).map_err(serde_json::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compact(value: &serde_json::Value) -> String {
        let mut out = Vec::new();
        encode_compact(&mut out, value).expect("encode");
        String::from_utf8(out).expect("utf-8")
    }

    #[test]
    fn escapes_html_characters_in_strings() {
        let out = compact(&json!({"a": "<b>&</b>"}));
        assert_eq!(out, "{\"a\":\"\\u003cb\\u003e\\u0026\\u003c/b\\u003e\"}\n");
    }

    #[test]
    fn escapes_html_characters_in_keys() {
        let out = compact(&json!({"<k>": 1}));
        assert_eq!(out, "{\"\\u003ck\\u003e\":1}\n");
    }

    #[test]
    fn keeps_standard_escapes() {
        let out = compact(&json!("q\"\n\t\u{2028}"));
        assert_eq!(out, "\"q\\\"\\n\\t\\u2028\"\n");
    }

    #[test]
    fn indents_with_tabs() {
        let mut out = Vec::new();
        encode_indented(&mut out, &json!({"animal": "walrus", "size": [1, 2]})).expect("encode");
        let expected = "{\n\t\"animal\": \"walrus\",\n\t\"size\": [\n\t\t1,\n\t\t2\n\t]\n}\n";
        assert_eq!(String::from_utf8(out).expect("utf-8"), expected);
    }

    #[test]
    fn empty_object_stays_on_one_line() {
        assert_eq!(to_string_indented(&json!({})).expect("encode"), "{}");
    }

    #[test]
    fn passes_through_multibyte_text() {
        assert_eq!(compact(&json!("héllo <wörld>")), "\"héllo \\u003cwörld\\u003e\"\n");
    }
}
