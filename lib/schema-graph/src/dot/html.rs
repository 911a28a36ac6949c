/// Escapes text placed inside an HTML-like label.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// `HREF`/`ID` attribute pair that makes a table cell addressable in the SVG.
pub fn html_id(id: &str) -> String {
    format!(r#"HREF="remove_me_url" ID="{id}""#)
}

/// Wraps label text in a `FONT` element, writing `]` as a character reference.
pub fn text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    format!("<FONT>{}</FONT>", escape(raw).replace(']', "&#93;"))
}
