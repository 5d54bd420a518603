//! Wikilink and embed rewriting for `[[target]]`, `[[target|text]]` and `![[target]]`.

use crate::slug::slugify;

/// Extensions rendered as `<img>` when embedded
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "avif"];

/// A piece of body text produced by [`scan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, including any malformed reference syntax
    Text(&'a str),

    /// `[[target]]` or `[[target|alias]]`, untrimmed
    Link {
        target: &'a str,
        alias: Option<&'a str>,
    },

    /// `![[target]]`, untrimmed
    Embed { target: &'a str },
}

/// Split text into literal runs and well-formed references.
///
/// A reference is malformed, and stays inside a `Text` segment, when it has
/// no closing `]]`, an empty target, an empty alias, or a bracket inside the
/// brackets. Embeds do not take an alias.
pub fn scan(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find("[[") {
        let open = cursor + found;
        let inner_start = open + 2;

        let Some(close_offset) = text[inner_start..].find("]]") else {
            // No closing ]] anywhere after this point
            break;
        };
        let close = inner_start + close_offset;
        let inner = &text[inner_start..close];
        let embed = open > 0 && text.as_bytes()[open - 1] == b'!';

        match parse_reference(inner, embed) {
            Some(segment) => {
                let start = if embed { open - 1 } else { open };
                if start > text_start {
                    segments.push(Segment::Text(&text[text_start..start]));
                }
                segments.push(segment);
                text_start = close + 2;
                cursor = close + 2;
            }
            None => cursor = open + 1,
        }
    }

    if text_start < text.len() {
        segments.push(Segment::Text(&text[text_start..]));
    }

    segments
}

fn parse_reference(inner: &str, embed: bool) -> Option<Segment<'_>> {
    if inner.contains(['[', ']']) {
        return None;
    }

    if embed {
        if inner.contains('|') || inner.trim().is_empty() {
            return None;
        }
        return Some(Segment::Embed { target: inner });
    }

    let (target, alias) = match inner.split_once('|') {
        Some((target, alias)) => (target, Some(alias)),
        None => (inner, None),
    };

    if target.trim().is_empty() || alias.is_some_and(|a| a.trim().is_empty()) {
        return None;
    }

    Some(Segment::Link { target, alias })
}

/// Rewrite embeds and wikilinks into HTML markup.
///
/// Existence of the linked page is not checked; every well-formed reference
/// becomes a link.
///
/// ```
/// use nodig_core::resolve_links;
///
/// assert_eq!(resolve_links("See [[Page Name|here]]"), r#"See <a href="/page-name">here</a>"#);
/// assert_eq!(resolve_links("![[x.png]]"), r#"<img src="/xpng" alt="x.png" />"#);
/// ```
pub fn resolve_links(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for segment in scan(text) {
        match segment {
            Segment::Text(literal) => out.push_str(literal),
            Segment::Embed { target } => render_embed(&mut out, target),
            Segment::Link { target, alias } => {
                let label = alias.unwrap_or(target).trim();
                push_anchor(&mut out, &slugify(target.trim()), label);
            }
        }
    }

    out
}

/// Trimmed targets of plain wikilinks, in order of appearance (embeds excluded)
pub fn outgoing_links(text: &str) -> Vec<String> {
    scan(text)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Link { target, .. } => Some(target.trim().to_string()),
            _ => None,
        })
        .collect()
}

fn render_embed(out: &mut String, target: &str) {
    let trimmed = target.trim();
    if is_image(trimmed) {
        out.push_str("<img src=\"/");
        out.push_str(&slugify(trimmed));
        out.push_str("\" alt=\"");
        out.push_str(&escape_html(target));
        out.push_str("\" />");
    } else {
        let name = strip_extension(trimmed);
        push_anchor(out, &slugify(name), name);
    }
}

fn push_anchor(out: &mut String, slug: &str, label: &str) {
    out.push_str("<a href=\"/");
    out.push_str(slug);
    out.push_str("\">");
    out.push_str(&escape_html(label));
    out.push_str("</a>");
}

fn extension(target: &str) -> Option<&str> {
    let file_name = target.rsplit('/').next().unwrap_or(target);
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

/// Whether an embed target names an image file
pub fn is_image(target: &str) -> bool {
    extension(target).is_some_and(|ext| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    })
}

/// Drop a trailing file extension (`notes/a.md` -> `notes/a`)
pub fn strip_extension(target: &str) -> &str {
    match extension(target) {
        Some(ext) => &target[..target.len() - ext.len() - 1],
        None => target,
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
