//! Handoff of the finished site model to an external renderer.

use crate::models::SiteModel;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Receives the site model at the end of a build.
///
/// HTML templating, routing and asset handling belong to the implementor.
#[async_trait]
pub trait SiteRenderer: Send + Sync {
    async fn render(&self, site: &SiteModel, output_dir: &Path) -> Result<()>;
}

/// Writes the site model as JSON files for a downstream site generator:
/// `pages.json`, `navigation.json`, `backlinks.json` and `tags.json`.
#[derive(Debug, Clone, Copy)]
pub struct JsonSiteWriter {
    pretty: bool,
}

impl JsonSiteWriter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    fn write_json<T: Serialize + ?Sized>(&self, output_dir: &Path, name: &str, value: &T) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
        .with_context(|| format!("Failed to serialize {name}"))?;

        let path = output_dir.join(name);
        fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::info!("Generated {}", name);
        Ok(())
    }
}

impl Default for JsonSiteWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SiteRenderer for JsonSiteWriter {
    async fn render(&self, site: &SiteModel, output_dir: &Path) -> Result<()> {
        fs::create_dir_all(output_dir).context("Failed to create output directory")?;

        self.write_json(output_dir, "pages.json", &site.pages)?;
        self.write_json(output_dir, "navigation.json", &site.navigation)?;
        self.write_json(output_dir, "backlinks.json", &site.backlinks)?;
        self.write_json(output_dir, "tags.json", &site.tags)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NavNode;
    use serde_json::Value;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_writes_all_artifacts() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("site");

        let mut site = SiteModel::default();
        site.navigation.push(NavNode::file("a.md", "a.md"));
        site.backlinks.add_link("a.md", "B");
        site.tags.insert("rust".to_string(), vec!["/a".to_string()]);

        JsonSiteWriter::compact().render(&site, &out).await.unwrap();

        for name in ["pages.json", "navigation.json", "backlinks.json", "tags.json"] {
            assert!(out.join(name).exists(), "{name} missing");
        }

        let backlinks: Value =
            serde_json::from_str(&fs::read_to_string(out.join("backlinks.json")).unwrap()).unwrap();
        assert_eq!(backlinks["B"][0], "a.md");

        let nav = fs::read_to_string(out.join("navigation.json")).unwrap();
        assert_eq!(nav, r#"[{"name":"a.md","path":"a.md","children":[]}]"#);
    }
}
