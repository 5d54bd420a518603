//! Content model structs for documents, pages, navigation and diagnostics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

use crate::backlinks::BacklinkIndex;

/// A raw source document as read from the vault (or a test fixture)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Vault-relative path, forward slashes
    pub path: String,

    /// Unmodified file contents
    pub raw_text: String,
}

impl Document {
    pub fn new(path: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// Frontmatter metadata decoded from the leading `---` block.
///
/// Keys are kept sorted so two decodes of equivalent blocks compare equal
/// regardless of the order fields were written in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter(BTreeMap<String, Value>);

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a field as a string if it is a string scalar
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Get a date-like scalar (`2024-01-01` or an RFC 3339 timestamp)
    pub fn get_date(&self, key: &str) -> Option<NaiveDate> {
        let raw = self.get_str(key)?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
    }

    /// Tags declared in frontmatter, either as a sequence or a single string
    pub fn tags(&self) -> Vec<String> {
        match self.0.get("tags") {
            Some(Value::Sequence(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(s)) => s
                .split([',', ' '])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.trim_start_matches('#').to_string())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Frontmatter {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How the frontmatter block of a document was decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontmatterDecode {
    /// No `---` block present
    Absent,
    /// Block decoded as a YAML mapping
    Strict,
    /// YAML decoding failed; fields came from the `key: value` line split
    Fallback,
}

/// A document split into metadata and body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedDocument {
    pub frontmatter: Frontmatter,

    /// Body with the frontmatter block removed, trimmed
    pub content: String,

    #[serde(skip)]
    pub decode: FrontmatterDecode,
}

/// A page in the vault, identified by its URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// URL derived from the vault-relative path (e.g. "/blog/")
    pub url: String,

    /// Vault-relative source path, forward slashes
    pub path: String,

    pub content: String,

    pub frontmatter: Frontmatter,
}

/// A node in the navigation tree.
///
/// `path` is only set on nodes that correspond to a real file; folder
/// groupings have none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavNode {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default)]
    pub children: Vec<NavNode>,
}

impl NavNode {
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            children: Vec::new(),
        }
    }

    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
            children: Vec::new(),
        }
    }

    pub fn is_file(&self) -> bool {
        self.path.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Info,
    Warning,
    Error,
}

/// A recoverable problem observed while transforming a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub severity: DiagnosticSeverity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,

    /// Vault-relative path of the document, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
}

impl Diagnostic {
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: DiagnosticSeverity::Warning,
            plugin: None,
            source_path: None,
        }
    }
}

/// Result of running the transformation pipeline over one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformedPage {
    pub frontmatter: Frontmatter,
    pub content: String,

    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

/// Everything handed to the site renderer at the end of a build
#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteModel {
    pub pages: Vec<Page>,
    pub navigation: Vec<NavNode>,
    pub backlinks: BacklinkIndex,

    /// Tag name to URLs of the pages using it
    pub tags: BTreeMap<String, Vec<String>>,
}
