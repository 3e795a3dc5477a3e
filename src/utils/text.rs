/// Drops control characters so upstream text cannot smuggle terminal escapes.
pub fn sanitize_for_terminal(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control() || *c == '\n')
        .collect()
}

/// Removes HTML tags together with the content of `<sup>` footnote markers.
///
/// Translations arrive as HTML fragments such as
/// `In the Name of Allah<sup foot_note=1>1</sup>`.
pub fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    let mut sup_depth = 0usize;

    while let Some(start) = rest.find('<') {
        if sup_depth == 0 {
            out.push_str(&rest[..start]);
        }
        let Some(end) = rest[start..].find('>') else {
            // Unterminated tag: keep the text verbatim.
            if sup_depth == 0 {
                out.push_str(&rest[start..]);
            }
            rest = "";
            break;
        };
        let tag = rest[start + 1..start + end].trim().to_ascii_lowercase();
        if tag == "sup" || tag.starts_with("sup ") {
            sup_depth += 1;
        } else if tag == "/sup" {
            sup_depth = sup_depth.saturating_sub(1);
        }
        rest = &rest[start + end + 1..];
    }
    if sup_depth == 0 {
        out.push_str(rest);
    }

    decode_entities(out.trim())
}

fn decode_entities(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
