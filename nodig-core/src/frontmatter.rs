//! Frontmatter parsing from markdown files.

use crate::models::{Frontmatter, FrontmatterDecode, ParsedDocument};
use regex::Regex;
use serde_yaml::Value;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Frontmatter is not a mapping")]
    NotAMapping,
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    // The block body group is lazily optional so `---\n---` is an empty block
    // rather than reaching for a later closing line.
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)??---[ \t]*(?:\r?\n|\z)(.*)\z").unwrap()
    })
}

/// Parse frontmatter from markdown content
///
/// Never fails: a block that is not valid YAML is decoded with a lenient
/// `key: value` line split instead, and `decode` reports which path was taken.
///
/// # Example
///
/// ```
/// use nodig_core::frontmatter::parse_frontmatter;
/// use nodig_core::FrontmatterDecode;
///
/// let doc = parse_frontmatter("---\ntitle: My Post\n---\n# Hello World\n");
/// assert_eq!(doc.frontmatter.get_str("title"), Some("My Post"));
/// assert_eq!(doc.content, "# Hello World");
/// assert_eq!(doc.decode, FrontmatterDecode::Strict);
/// ```
pub fn parse_frontmatter(content: &str) -> ParsedDocument {
    let input = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(captures) = frontmatter_regex().captures(input) else {
        return ParsedDocument {
            frontmatter: Frontmatter::new(),
            content: input.trim().to_string(),
            decode: FrontmatterDecode::Absent,
        };
    };

    let block = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str());

    let (frontmatter, decode) = match decode_strict(block) {
        Ok(fm) => (fm, FrontmatterDecode::Strict),
        Err(e) => {
            tracing::warn!("Falling back to line-based frontmatter: {}", e);
            (decode_lenient(block), FrontmatterDecode::Fallback)
        }
    };

    ParsedDocument {
        frontmatter,
        content: body.trim().to_string(),
        decode,
    }
}

/// Extract just the frontmatter without the body
pub fn extract_frontmatter(content: &str) -> Frontmatter {
    parse_frontmatter(content).frontmatter
}

/// Decode a block as a YAML mapping
pub fn decode_strict(block: &str) -> Result<Frontmatter, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(Frontmatter::new());
    }

    match serde_yaml::from_str::<Value>(block)? {
        Value::Null => Ok(Frontmatter::new()),
        Value::Mapping(mapping) => Ok(mapping
            .into_iter()
            .filter_map(|(key, value)| match key {
                Value::String(k) => Some((k, value)),
                Value::Number(n) => Some((n.to_string(), value)),
                Value::Bool(b) => Some((b.to_string(), value)),
                other => {
                    tracing::debug!("Dropping non-scalar frontmatter key {:?}", other);
                    None
                }
            })
            .collect()),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

/// Split a block into `key: value` pairs, one per line.
///
/// Lines without a colon or with an empty key are dropped. Values are kept
/// as plain strings.
pub fn decode_lenient(block: &str) -> Frontmatter {
    block
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), Value::String(value.trim().to_string())))
        })
        .collect()
}
