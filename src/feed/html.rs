//! HTML helpers for item descriptions.

use std::collections::HashSet;

/// Tags that survive sanitization.
const ALLOWED_TAGS: [&str; 28] = [
    "h3", "h4", "h5", "h6", "blockquote", "p", "a", "ul", "ol", "nl", "li", "b", "i", "strong",
    "em", "strike", "code", "hr", "br", "div", "table", "thead", "caption", "tbody", "tr", "th",
    "td", "pre",
];

/// Elements that never take a closing tag.
const VOID_TAGS: [&str; 6] = ["br", "hr", "img", "wbr", "col", "area"];

/// Marker appended where text was cut.
pub const ELLIPSIS: &str = "...";

/// Escape text for inclusion in HTML.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Strip everything but a small formatting subset of HTML.
///
/// Script and style elements are dropped with their content.
pub fn sanitize(html: &str) -> String {
    let tags: HashSet<&str> = ALLOWED_TAGS.into_iter().collect();

    ammonia::Builder::default()
        .tags(tags)
        .clean(html)
        .to_string()
}

/// Sanitize, then cut to `max_chars` visible characters without breaking markup.
pub fn sanitize_and_truncate(html: &str, max_chars: usize) -> String {
    truncate(&sanitize(html), max_chars)
}

/// Cut well-formed HTML after `max_chars` characters of text.
///
/// Tags are copied but not counted, an entity counts as one character, and
/// every element still open at the cut is closed after the ellipsis.
pub fn truncate(html: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(html.len());
    let mut open: Vec<String> = Vec::new();
    let mut count = 0;
    let mut rest = html;

    while let Some(c) = rest.chars().next() {
        if c == '<' {
            let Some(end) = rest.find('>') else {
                break;
            };
            let tag = &rest[..=end];
            track_tag(tag, &mut open);
            out.push_str(tag);
            rest = &rest[end + 1..];
            continue;
        }

        if count == max_chars {
            out.push_str(ELLIPSIS);
            for name in open.iter().rev() {
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            return out;
        }

        let len = if c == '&' { entity_len(rest) } else { c.len_utf8() };
        out.push_str(&rest[..len]);
        rest = &rest[len..];
        count += 1;
    }

    html.to_string()
}

/// Update the open-element stack for one tag.
fn track_tag(tag: &str, open: &mut Vec<String>) {
    let inner = tag.trim_start_matches('<').trim_end_matches('>');
    if inner.starts_with('!') || inner.starts_with('?') || inner.ends_with('/') {
        return;
    }

    if let Some(closing) = inner.strip_prefix('/') {
        let name = tag_name(closing);
        if let Some(pos) = open.iter().rposition(|n| *n == name) {
            open.truncate(pos);
        }
        return;
    }

    let name = tag_name(inner);
    if !name.is_empty() && !VOID_TAGS.contains(&name.as_str()) {
        open.push(name);
    }
}

fn tag_name(inner: &str) -> String {
    inner
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Byte length of an entity reference at the start of `s`, or 1 for a bare `&`.
fn entity_len(s: &str) -> usize {
    s.char_indices()
        .take(12)
        .find(|(_, c)| *c == ';')
        .map(|(i, _)| i + 1)
        .unwrap_or(1)
}
