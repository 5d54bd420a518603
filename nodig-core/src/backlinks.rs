//! Reverse reference index across a set of documents.

use crate::markdown::outgoing_links;
use crate::slug::slugify;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Map from link target to the paths of the documents that reference it.
///
/// Keys are the target text as written (trimmed) unless the index has been
/// [`canonicalize`](BacklinkIndex::canonicalize)d into slug space. A target
/// only has an entry once something links to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BacklinkIndex {
    incoming: BTreeMap<String, Vec<String>>,
}

impl BacklinkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `source` references `target`
    pub fn add_link(&mut self, source: &str, target: &str) {
        self.incoming
            .entry(target.to_string())
            .or_default()
            .push(source.to_string());
    }

    /// Sources referencing `target`, or `None` if nothing does
    pub fn get(&self, target: &str) -> Option<&[String]> {
        self.incoming.get(target).map(Vec::as_slice)
    }

    /// Get backlinks for a target, empty if there are none
    pub fn backlinks(&self, target: &str) -> Vec<String> {
        self.incoming.get(target).cloned().unwrap_or_default()
    }

    pub fn contains(&self, target: &str) -> bool {
        self.incoming.contains_key(target)
    }

    pub fn len(&self) -> usize {
        self.incoming.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incoming.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.incoming.iter()
    }

    /// Re-key the index by link slug so `[[Page Name]]` and `[[page-name]]`
    /// share one entry. Sources are appended in key order, then insertion
    /// order within each original key.
    pub fn canonicalize(&self) -> BacklinkIndex {
        let mut canonical = BacklinkIndex::new();
        for (target, sources) in &self.incoming {
            let entry = canonical.incoming.entry(slugify(target)).or_default();
            entry.extend(sources.iter().cloned());
        }
        canonical
    }
}

/// Build a backlink index from `(path, content)` pairs.
///
/// Content is scanned as written, so frontmatter need not be stripped. Only
/// plain wikilinks count; embeds do not. Linking the same target twice from
/// one document records the source twice.
pub fn extract_backlinks<'a, I>(documents: I) -> BacklinkIndex
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut index = BacklinkIndex::new();
    for (path, content) in documents {
        for target in outgoing_links(content) {
            index.add_link(path, &target);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_backlinks() {
        let files = [
            ("A.md", "Link to [[B]] and [[C]]"),
            ("B.md", "Link to [[C]]"),
            ("C.md", "No links"),
        ];
        let backlinks = extract_backlinks(files);

        assert_eq!(backlinks.get("B"), Some(&["A.md".to_string()][..]));
        assert_eq!(backlinks.backlinks("C"), vec!["A.md", "B.md"]);
        assert_eq!(backlinks.get("A"), None);
        assert_eq!(backlinks.len(), 2);
    }

    #[test]
    fn test_duplicates_aliases_and_embeds() {
        let files = [("A.md", "[[ B ]] then [[B|again]] and ![[B]] and ![[pic.png]]")];
        let backlinks = extract_backlinks(files);

        assert_eq!(backlinks.backlinks("B"), vec!["A.md", "A.md"]);
        assert!(!backlinks.contains("pic.png"));
        assert_eq!(backlinks.len(), 1);
    }

    #[test]
    fn test_raw_keys_not_canonicalized() {
        let files = [("x.md", "[[Page Name]]"), ("y.md", "[[page-name]]")];
        let backlinks = extract_backlinks(files);
        assert_eq!(backlinks.len(), 2);

        let canonical = backlinks.canonicalize();
        assert_eq!(canonical.len(), 1);
        assert_eq!(canonical.backlinks("page-name"), vec!["x.md", "y.md"]);
    }

    #[test]
    fn test_frontmatter_is_scanned_too() {
        let files = [("A.md", "---\nrelated: \"[[B]]\"\n---\nBody")];
        assert_eq!(extract_backlinks(files).backlinks("B"), vec!["A.md"]);
    }
}
