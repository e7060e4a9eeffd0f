//! Content-type driven formatting of request and response payloads.
//!
//! Formatting never fails: a payload that does not parse as the type it
//! claims is returned as plain text.

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use serde::de::IgnoredAny;

/// Formats `body` for display according to `content_type`.
///
/// * contains `json` → re-indented with two spaces, tokens kept as sent
/// * contains `xml` or `html` → re-indented as XML
/// * anything else → decoded as text unchanged
pub fn render_body(body: &[u8], content_type: &str) -> String {
    let content_type = content_type.to_ascii_lowercase();

    let formatted = if content_type.contains("json") {
        pretty_json(body)
    } else if content_type.contains("xml") || content_type.contains("html") {
        pretty_xml(body)
    } else {
        None
    };

    formatted.unwrap_or_else(|| raw_text(body))
}

fn raw_text(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}

fn pretty_json(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<IgnoredAny>(body)
        .inspect_err(|err| tracing::debug!(error = %err, "payload is not valid JSON"))
        .ok()?;
    String::from_utf8(indent_json(body)).ok()
}

/// Re-lays out an already validated JSON document.
///
/// Only whitespace between tokens changes, so numbers, escapes and repeated
/// keys come out as they went in. Empty objects and arrays stay on one line.
fn indent_json(body: &[u8]) -> Vec<u8> {
    const INDENT: &[u8] = b"  ";

    fn newline(out: &mut Vec<u8>, depth: usize) {
        out.push(b'\n');
        for _ in 0..depth {
            out.extend_from_slice(INDENT);
        }
    }

    let mut out = Vec::with_capacity(body.len() * 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut just_opened = false;

    for &byte in body {
        if in_string {
            out.push(byte);
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        if matches!(byte, b' ' | b'\t' | b'\n' | b'\r') {
            continue;
        }

        let closing = matches!(byte, b'}' | b']');
        if just_opened && !closing {
            newline(&mut out, depth);
        }
        match byte {
            b'{' | b'[' => {
                out.push(byte);
                depth += 1;
                just_opened = true;
                continue;
            }
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                if !just_opened {
                    newline(&mut out, depth);
                }
                out.push(byte);
            }
            b',' => {
                out.push(byte);
                newline(&mut out, depth);
            }
            b':' => out.extend_from_slice(b": "),
            b'"' => {
                in_string = true;
                out.push(byte);
            }
            _ => out.push(byte),
        }
        just_opened = false;
    }
    out
}

/// HTML goes through the XML parser as well, so most real pages fall back to
/// raw text.
fn pretty_xml(body: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    let mut depth = 0usize;
    let mut elements = 0usize;
    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                tracing::debug!(error = %err, "payload is not valid XML");
                return None;
            }
        };
        match &event {
            Event::Eof => break,
            Event::Start(_) => {
                depth += 1;
                elements += 1;
            }
            Event::Empty(_) => elements += 1,
            Event::End(_) => depth = depth.checked_sub(1)?,
            _ => {}
        }
        writer.write_event(event).ok()?;
    }

    if depth != 0 || elements == 0 {
        return None;
    }
    String::from_utf8(writer.into_inner()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_pretty_printed_with_two_spaces() {
        let rendered = render_body(br#"{"origin":"1.2.3.4","list":[1,2]}"#, "application/json");
        assert_eq!(
            rendered,
            "{\n  \"origin\": \"1.2.3.4\",\n  \"list\": [\n    1,\n    2\n  ]\n}"
        );
    }

    #[test]
    fn json_keeps_key_order() {
        let rendered = render_body(br#"{"z":1,"a":2}"#, "application/json");
        assert_eq!(rendered, "{\n  \"z\": 1,\n  \"a\": 2\n}");
    }

    #[test]
    fn json_tokens_are_kept_verbatim() {
        let rendered = render_body(
            br#"{"id": 123456789012345678901234, "e": 1e2, "k": 1, "k": 2}"#,
            "application/json",
        );
        assert_eq!(
            rendered,
            "{\n  \"id\": 123456789012345678901234,\n  \"e\": 1e2,\n  \"k\": 1,\n  \"k\": 2\n}"
        );
    }

    #[test]
    fn json_strings_and_empty_containers_are_untouched() {
        let rendered = render_body(
            br#"{"s": "a, b: {c} \"q\" \u00e9", "o": {}, "l": [ ]}"#,
            "application/json",
        );
        assert_eq!(
            rendered,
            "{\n  \"s\": \"a, b: {c} \\\"q\\\" \\u00e9\",\n  \"o\": {},\n  \"l\": []\n}"
        );
    }

    #[test]
    fn json_scalars_render_bare() {
        assert_eq!(render_body(b" 42 ", "application/json"), "42");
        assert_eq!(render_body(b"[]", "application/json"), "[]");
        assert_eq!(render_body(b"[1e400]", "application/json"), "[\n  1e400\n]");
    }

    #[test]
    fn rendering_json_twice_is_identical() {
        let body = br#"{"hippo": "rules", "n": [true, null]}"#;
        let first = render_body(body, "application/json; charset=utf-8");
        let second = render_body(body, "application/json; charset=utf-8");
        assert_eq!(first, second);
        assert_eq!(render_body(first.as_bytes(), "application/json"), first);
    }

    #[test]
    fn broken_json_falls_back_to_raw_text() {
        assert_eq!(render_body(br#"{"broken""#, "application/json"), r#"{"broken""#);
    }

    #[test]
    fn content_type_match_ignores_case() {
        let rendered = render_body(br#"{"a":1}"#, "Application/JSON");
        assert_eq!(rendered, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn xml_is_reindented() {
        let rendered = render_body(b"<root><item>1</item><empty/></root>", "text/xml");
        assert_eq!(rendered, "<root>\n  <item>1</item>\n  <empty/>\n</root>");
    }

    #[test]
    fn malformed_xml_falls_back_to_raw_text() {
        let body = b"<root><item>1</root>";
        assert_eq!(render_body(body, "application/xml"), "<root><item>1</root>");

        let unclosed = b"<root><item>1</item>";
        assert_eq!(render_body(unclosed, "application/xml"), "<root><item>1</item>");
    }

    #[test]
    fn typical_html_falls_back_to_raw_text() {
        let body = b"<!DOCTYPE html><html><body><br><p>hi</p></body></html>";
        assert_eq!(
            render_body(body, "text/html; charset=UTF-8"),
            String::from_utf8_lossy(body)
        );
    }

    #[test]
    fn other_types_are_left_alone() {
        assert_eq!(render_body(b"plain {\"a\":1}", "text/plain"), "plain {\"a\":1}");
        assert_eq!(render_body(br#"{"a":1}"#, ""), r#"{"a":1}"#);
    }

    #[test]
    fn empty_body_renders_empty() {
        assert_eq!(render_body(b"", "application/json"), "");
        assert_eq!(render_body(b"", ""), "");
    }
}
