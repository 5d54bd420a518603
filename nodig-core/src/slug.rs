//! Slug generation for link targets and vault paths.

use regex::Regex;
use std::sync::OnceLock;

struct SlugPatterns {
    md_extension: Regex,
    disallowed: Regex,
    whitespace: Regex,
    hyphens: Regex,
    slashes: Regex,
}

static SLUG_PATTERNS: OnceLock<SlugPatterns> = OnceLock::new();

fn patterns() -> &'static SlugPatterns {
    SLUG_PATTERNS.get_or_init(|| SlugPatterns {
        md_extension: Regex::new(r"(?i)\.md$").unwrap(),
        disallowed: Regex::new(r"[^A-Za-z0-9\-_\s/]").unwrap(),
        whitespace: Regex::new(r"\s+").unwrap(),
        hyphens: Regex::new(r"-+").unwrap(),
        slashes: Regex::new(r"/+").unwrap(),
    })
}

/// Convert a link target to a URL slug
///
/// Rules, applied in order:
/// - Strip a trailing `.md` (any case)
/// - Remove everything except ASCII letters, digits, `-`, `_`, whitespace and `/`
/// - Replace whitespace runs with a single hyphen
/// - Collapse repeated hyphens and repeated slashes
/// - Lowercase
///
/// Path separators survive, so nested targets keep their folders.
///
/// # Examples
///
/// ```
/// use nodig_core::slugify;
///
/// assert_eq!(slugify("Page Name"), "page-name");
/// assert_eq!(slugify("image.png"), "imagepng");
/// assert_eq!(slugify("inner/Note.md"), "inner/note");
/// ```
pub fn slugify(input: &str) -> String {
    let p = patterns();
    let stripped = p.md_extension.replace(input, "");
    let cleaned = p.disallowed.replace_all(&stripped, "");
    let hyphenated = p.whitespace.replace_all(&cleaned, "-");
    let collapsed = p.hyphens.replace_all(&hyphenated, "-");
    let single_slashes = p.slashes.replace_all(&collapsed, "/");
    single_slashes.to_lowercase()
}

/// Slug-space URL for a vault-relative file path
///
/// ```
/// use nodig_core::slug::url_from_path;
///
/// assert_eq!(url_from_path("folder/subfolder/Page Name.md"), "/folder/subfolder/page-name");
/// ```
pub fn url_from_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let slug = slugify(&normalized);
    format!("/{}", slug.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Test"), "test");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(slugify("Rust & Safety"), "rust-safety");
        assert_eq!(slugify("What's new?"), "whats-new");
        assert_eq!(slugify("x.png"), "xpng");
    }

    #[test]
    fn test_md_extension() {
        assert_eq!(slugify("note.md"), "note");
        assert_eq!(slugify("NOTE.MD"), "note");
        assert_eq!(slugify("note.md.bak"), "notemdbak");
    }

    #[test]
    fn test_whitespace_and_hyphens() {
        assert_eq!(slugify("Multiple   Spaces\tHere"), "multiple-spaces-here");
        assert_eq!(slugify("a - b"), "a-b");
        assert_eq!(slugify("keep_underscores"), "keep_underscores");
    }

    #[test]
    fn test_slashes_preserved_and_collapsed() {
        assert_eq!(slugify("inner/image.png"), "inner/imagepng");
        assert_eq!(slugify("a//b///c"), "a/b/c");
    }

    #[test]
    fn test_non_ascii_removed() {
        assert_eq!(slugify("Café"), "caf");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_url_from_path() {
        assert_eq!(url_from_path("folder/subfolder/Page Name.md"), "/folder/subfolder/page-name");
        assert_eq!(url_from_path("folder\\Other.md"), "/folder/other");
        assert_eq!(url_from_path("/abs.md"), "/abs");
    }
}
