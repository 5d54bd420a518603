//! Site building logic - orchestrates loading, transformation, indexing and handoff.

use crate::{
    backlinks::extract_backlinks,
    config::{BacklinkKeys, Config},
    markdown::extract_tags,
    models::*,
    navigation::build_navigation_tree,
    pipeline::ContentPipeline,
    plugin::{
        BuildEndContext, BuildStartContext, ContentPlugin, HookContext, PluginError, PluginHost,
    },
    render::SiteRenderer,
    vault::{pages_from_documents, url_collisions, VaultError, VaultLoader},
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("Renderer failed: {0:#}")]
    Render(#[source] anyhow::Error),
}

/// What a finished build produced
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub site: SiteModel,
    pub output: PathBuf,

    /// Recoverable problems: URL collisions and isolated document-level
    /// failures, one per failed hook call
    pub diagnostics: Vec<Diagnostic>,
}

/// Main site builder
pub struct SiteBuilder {
    config: Config,
    pipeline: ContentPipeline,
}

impl SiteBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pipeline: ContentPipeline::new(),
        }
    }

    /// Add a document-level plugin; plugins run in the order added
    pub fn content_plugin(mut self, plugin: Box<dyn ContentPlugin>) -> Self {
        self.pipeline.push(plugin);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the entire site.
    ///
    /// Hook order: `onBuildStart`, `onVaultParsed`, `onPageGenerated` once
    /// per page, then the renderer, then `onBuildEnd`. Any build-level hook,
    /// I/O or renderer failure aborts the build.
    pub async fn build(
        &self,
        host: &PluginHost,
        renderer: &dyn SiteRenderer,
    ) -> Result<BuildSummary, BuildError> {
        let vault = self.config.vault_dir();
        let output = self.config.output_dir();

        tracing::info!("Building site from {:?}", vault);

        let start = BuildStartContext {
            vault: vault.clone(),
            output: output.clone(),
        };
        host.run_hook(HookContext::BuildStart(&start)).await?;

        let loader = VaultLoader::new(&vault).with_ignore_patterns(&self.config.ignore_patterns);
        let documents = loader.documents()?;
        let mut pages = pages_from_documents(&documents);
        let mut diagnostics = url_collisions(&pages);

        host.run_hook(HookContext::VaultParsed { pages: &pages }).await?;

        let mut tags: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (doc, page) in documents.iter().zip(pages.iter_mut()) {
            for tag in page
                .frontmatter
                .tags()
                .into_iter()
                .chain(extract_tags(&page.content))
            {
                let urls = tags.entry(tag).or_default();
                if !urls.contains(&page.url) {
                    urls.push(page.url.clone());
                }
            }

            let transformed = self.pipeline.transform(&doc.raw_text);
            page.content = transformed.content;
            page.frontmatter = transformed.frontmatter;
            diagnostics.extend(transformed.diagnostics.into_iter().map(|d| Diagnostic {
                source_path: Some(doc.path.clone()),
                ..d
            }));

            tracing::debug!("Transformed {} -> {}", page.path, page.url);
            host.run_hook(HookContext::PageGenerated { page: &*page }).await?;
        }

        let navigation = build_navigation_tree(pages.iter().map(|p| p.path.as_str()));

        let mut backlinks = extract_backlinks(
            documents
                .iter()
                .map(|d| (d.path.as_str(), d.raw_text.as_str())),
        );
        if self.config.backlink_keys == BacklinkKeys::Slug {
            backlinks = backlinks.canonicalize();
        }

        let site = SiteModel {
            pages,
            navigation,
            backlinks,
            tags,
        };

        renderer
            .render(&site, &output)
            .await
            .map_err(BuildError::Render)?;

        let end = BuildEndContext {
            pages: site.pages.len(),
            output: output.clone(),
        };
        host.run_hook(HookContext::BuildEnd(&end)).await?;

        if !diagnostics.is_empty() {
            tracing::warn!("{} recoverable issues during build", diagnostics.len());
        }
        tracing::info!("✓ Built {} pages", site.pages.len());
        tracing::info!("✓ Output written to {:?}", output);

        Ok(BuildSummary {
            site,
            output,
            diagnostics,
        })
    }
}
