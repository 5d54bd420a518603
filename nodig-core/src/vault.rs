//! Vault discovery: walk a directory of markdown files into pages.

use crate::frontmatter::parse_frontmatter;
use crate::models::{Diagnostic, Document, Page};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Vault root is not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Failed to walk vault: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loads documents and pages from a vault directory
#[derive(Debug, Clone)]
pub struct VaultLoader {
    root: PathBuf,
    ignore: Vec<Regex>,
}

impl VaultLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore: Vec::new(),
        }
    }

    /// Skip documents whose vault-relative path matches any of these regexes.
    /// Invalid patterns are logged and ignored.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        self.ignore = compile_ignore_patterns(patterns);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read every `.md` file under the root, sorted by relative path.
    ///
    /// Any walk or read failure aborts the load.
    pub fn documents(&self) -> Result<Vec<Document>, VaultError> {
        if !self.root.is_dir() {
            return Err(VaultError::NotADirectory(self.root.clone()));
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }

            let rel = relative_path(&self.root, entry.path());
            if self.ignore.iter().any(|re| re.is_match(&rel)) {
                tracing::debug!("Ignoring {} due to ignore_patterns", rel);
                continue;
            }

            let raw_text = fs::read_to_string(entry.path()).map_err(|source| VaultError::Read {
                path: entry.path().to_path_buf(),
                source,
            })?;
            documents.push(Document::new(rel, raw_text));
        }

        // Walk order is whatever the filesystem reports
        documents.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::info!("Found {} markdown files", documents.len());

        Ok(documents)
    }

    /// Load all pages
    pub fn load(&self) -> Result<Vec<Page>, VaultError> {
        Ok(pages_from_documents(&self.documents()?))
    }
}

/// Load every page under `root`
pub fn load_vault(root: impl AsRef<Path>) -> Result<Vec<Page>, VaultError> {
    VaultLoader::new(root.as_ref()).load()
}

/// Decode documents into pages, one per document
pub fn pages_from_documents(documents: &[Document]) -> Vec<Page> {
    documents.iter().map(page_from_document).collect()
}

/// Report every page whose URL was already taken by an earlier page.
///
/// All pages are kept; the diagnostic names the later path.
pub fn url_collisions(pages: &[Page]) -> Vec<Diagnostic> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    let mut collisions = Vec::new();

    for page in pages {
        if let Some(first) = seen.get(page.url.as_str()) {
            tracing::warn!("Duplicate URL {}: {} and {}", page.url, first, page.path);
            collisions.push(Diagnostic {
                source_path: Some(page.path.clone()),
                ..Diagnostic::warning(
                    "vault.duplicate_url",
                    format!("URL {} is also produced by {}", page.url, first),
                )
            });
        } else {
            seen.insert(&page.url, &page.path);
        }
    }

    collisions
}

/// Decode one document into a page
pub fn page_from_document(doc: &Document) -> Page {
    let parsed = parse_frontmatter(&doc.raw_text);
    Page {
        url: page_url(&doc.path),
        path: doc.path.clone(),
        content: parsed.content,
        frontmatter: parsed.frontmatter,
    }
}

/// URL for a vault-relative path: `.md` dropped, a final `index` segment
/// dropped.
///
/// ```
/// use nodig_core::vault::page_url;
///
/// assert_eq!(page_url("blog/index.md"), "/blog/");
/// assert_eq!(page_url("index.md"), "/");
/// assert_eq!(page_url("notes/Home.md"), "/notes/Home");
/// ```
pub fn page_url(rel_path: &str) -> String {
    let normalized = rel_path.replace('\\', "/");
    let stem = normalized.strip_suffix(".md").unwrap_or(&normalized);
    let without_index = match stem.rsplit_once('/') {
        Some((dir, "index")) => format!("{dir}/"),
        None if stem == "index" => String::new(),
        _ => stem.to_string(),
    };
    format!("/{}", without_index.trim_start_matches('/'))
}

fn is_markdown(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".md"))
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn compile_ignore_patterns(patterns: &[String]) -> Vec<Regex> {
    let mut compiled = Vec::new();
    for pat in patterns {
        match Regex::new(pat) {
            Ok(re) => compiled.push(re),
            Err(err) => tracing::warn!("Invalid ignore pattern '{}': {}", pat, err),
        }
    }
    compiled
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_page_url() {
        assert_eq!(page_url("blog/index.md"), "/blog/");
        assert_eq!(page_url("index.md"), "/");
        assert_eq!(page_url("a/b/c.md"), "/a/b/c");
        assert_eq!(page_url("a\\b.md"), "/a/b");
        assert_eq!(page_url("notes/myindex.md"), "/notes/myindex");
        assert_eq!(page_url("Index.md"), "/Index");
    }

    #[test]
    fn test_load_vault() {
        let dir = tempdir().unwrap();
        write(dir.path(), "index.md", "---\ntitle: Home\n---\nWelcome home");
        write(dir.path(), "blog/index.md", "Blog root");
        write(dir.path(), "blog/post.md", "---\ntags: [a]\n---\n\nPost body\n");
        write(dir.path(), "notes.MD", "upper-case extension is not markdown");
        write(dir.path(), "image.png", "not markdown");

        let pages = load_vault(dir.path()).unwrap();
        let urls: Vec<&str> = pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["/blog/", "/blog/post", "/"]);

        let home = pages.iter().find(|p| p.url == "/").unwrap();
        assert_eq!(home.frontmatter.get_str("title"), Some("Home"));
        assert_eq!(home.content, "Welcome home");
        assert_eq!(home.path, "index.md");

        let post = pages.iter().find(|p| p.url == "/blog/post").unwrap();
        assert_eq!(post.content, "Post body");
        assert_eq!(post.frontmatter.tags(), vec!["a"]);
    }

    #[test]
    fn test_ignore_patterns() {
        let dir = tempdir().unwrap();
        write(dir.path(), "keep.md", "keep");
        write(dir.path(), "drafts/skip.md", "skip");

        let loader = VaultLoader::new(dir.path())
            .with_ignore_patterns(&["^drafts/".to_string(), "([".to_string()]);
        let docs = loader.documents().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].path, "keep.md");
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load_vault(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, VaultError::NotADirectory(_)));
    }

    #[test]
    fn test_duplicate_urls_reported_not_fatal() {
        let docs = vec![
            Document::new("blog/.md", "dot"),
            Document::new("blog/index.md", "one"),
            Document::new("blog\\index.md", "two"),
            Document::new("other.md", "fine"),
        ];
        let pages = pages_from_documents(&docs);
        assert_eq!(pages.len(), 4);

        let collisions = url_collisions(&pages);
        let paths: Vec<&str> = collisions
            .iter()
            .map(|d| d.source_path.as_deref().unwrap())
            .collect();
        assert_eq!(paths, vec!["blog/index.md", "blog\\index.md"]);
        assert!(collisions.iter().all(|d| d.code == "vault.duplicate_url"));
        assert!(collisions[0].message.contains("blog/.md"));
    }
}
