//! Output-time HTML filtering for free-text fields.
//!
//! Tags on a small whitelist are rebuilt from scratch with only their allowed
//! attributes; every other tag is escaped so it renders as text. The filter is
//! idempotent: feeding its output back in returns the same string.

const SAFE_URL_PREFIXES: &[&str] = &[
    "http://", "https://", "mailto:", "tel:", "ftp://", "#", "/", "./", "../",
];

fn allowed_attributes(tag: &str) -> Option<&'static [&'static str]> {
    let attrs: &'static [&'static str] = match tag {
        "a" => &["target", "href", "title"],
        "img" => &["src", "alt", "title", "width", "height"],
        "abbr" => &["title"],
        "blockquote" | "q" => &["cite"],
        "del" | "ins" => &["datetime"],
        "table" => &["width", "border", "align", "valign"],
        "td" | "th" => &["width", "rowspan", "colspan", "align", "valign"],
        "b" | "i" | "u" | "s" | "em" | "strong" | "small" | "sub" | "sup" | "mark" | "br"
        | "hr" | "p" | "span" | "div" | "code" | "pre" | "ul" | "ol" | "li" | "h1" | "h2"
        | "h3" | "h4" | "h5" | "h6" | "thead" | "tbody" | "tfoot" | "tr" | "caption" => &[],
        _ => return None,
    };
    Some(attrs)
}

pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('<') {
        escape_text(&rest[..start], &mut out);
        let candidate = &rest[start..];

        if let Some(body) = candidate.strip_prefix("<!--") {
            if let Some(end) = body.find("-->") {
                rest = &body[end + 3..];
                continue;
            }
        }

        match tag_end(candidate) {
            Some(end) => {
                write_tag(&candidate[..=end], &mut out);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push_str("&lt;");
                rest = &candidate[1..];
            }
        }
    }

    escape_text(rest, &mut out);
    out
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

/// Byte offset of the `>` closing the tag that opens `candidate`, or `None` if
/// the leading `<` is just text.
fn tag_end(candidate: &str) -> Option<usize> {
    let bytes = candidate.as_bytes();
    let first = *bytes.get(1)?;
    let name_start = if first == b'/' { *bytes.get(2)? } else { first };
    if !name_start.is_ascii_alphabetic() {
        return None;
    }

    let mut quote = None;
    for (i, &b) in bytes.iter().enumerate().skip(1) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return Some(i),
                b'<' => return None,
                _ => {}
            },
        }
    }
    None
}

fn write_tag(raw: &str, out: &mut String) {
    let inner = &raw[1..raw.len() - 1];
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(stripped) => (true, stripped),
        None => (false, inner),
    };
    let name_len = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let name = inner[..name_len].to_ascii_lowercase();

    let Some(allowed) = allowed_attributes(&name) else {
        escape_text(raw, out);
        return;
    };

    if closing {
        out.push_str("</");
        out.push_str(&name);
        out.push('>');
        return;
    }

    let attr_source = &inner[name_len..];
    out.push('<');
    out.push_str(&name);
    for (attr, value) in parse_attributes(attr_source) {
        if !allowed.contains(&attr.as_str()) {
            continue;
        }
        out.push(' ');
        out.push_str(&attr);
        if let Some(value) = value.and_then(|v| safe_attribute_value(&attr, &v)) {
            out.push_str("=\"");
            out.push_str(&value);
            out.push('"');
        }
    }
    if attr_source.trim_end().ends_with('/') {
        out.push_str(" /");
    }
    out.push('>');
}

fn parse_attributes(source: &str) -> Vec<(String, Option<String>)> {
    let mut attrs = Vec::new();
    let mut rest = source;

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            break;
        }

        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();
        rest = &rest[name_end..];

        let value = match rest.trim_start().strip_prefix('=') {
            Some(after_eq) => {
                let (value, remaining) = read_value(after_eq.trim_start());
                rest = remaining;
                Some(value)
            }
            None => None,
        };

        if !name.is_empty() {
            attrs.push((name, value));
        }
    }

    attrs
}

fn read_value(source: &str) -> (String, &str) {
    match source.chars().next() {
        Some(q @ ('"' | '\'')) => {
            let body = &source[1..];
            match body.find(q) {
                Some(end) => (body[..end].to_string(), &body[end + 1..]),
                None => (body.to_string(), ""),
            }
        }
        _ => {
            let end = source.find(char::is_whitespace).unwrap_or(source.len());
            (source[..end].to_string(), &source[end..])
        }
    }
}

/// Re-encoded attribute value, or `None` when a link target is not on the
/// safe-prefix list.
fn safe_attribute_value(attr: &str, raw: &str) -> Option<String> {
    let decoded = raw
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">");
    let value = decoded.trim();

    if matches!(attr, "href" | "src") {
        let lower = value.to_ascii_lowercase();
        if !SAFE_URL_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
            return None;
        }
    }

    Some(
        value
            .replace('"', "&quot;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    )
}
