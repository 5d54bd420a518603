//! Hashtag extraction.

use regex::Regex;
use std::sync::OnceLock;

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(r"(?:^|\s)#([A-Za-z0-9\-_]+)").unwrap())
}

/// Extract `#tag` tokens from body text.
///
/// A tag starts at the beginning of the text or after whitespace. Names are
/// returned without the `#`, in order of appearance, duplicates included.
///
/// ```
/// use nodig_core::extract_tags;
///
/// assert_eq!(extract_tags("#a #b-c"), vec!["a", "b-c"]);
/// ```
pub fn extract_tags(text: &str) -> Vec<String> {
    tag_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tags() {
        let tags = extract_tags("This is a #tag and another #business.");
        assert_eq!(tags, vec!["tag", "business"]);
    }

    #[test]
    fn test_duplicates_and_order_kept() {
        assert_eq!(extract_tags("#b #a #b"), vec!["b", "a", "b"]);
    }

    #[test]
    fn test_requires_leading_whitespace() {
        assert_eq!(extract_tags("issue#12 a#b\n#next"), vec!["next"]);
        assert_eq!(extract_tags("#a#b"), vec!["a"]);
    }

    #[test]
    fn test_headings_and_empty_tags_ignored() {
        assert!(extract_tags("# Heading\n## Sub").is_empty());
        assert!(extract_tags("# ").is_empty());
    }

    #[test]
    fn test_underscores_and_digits() {
        assert_eq!(extract_tags("\t#snake_case #2024"), vec!["snake_case", "2024"]);
    }
}
