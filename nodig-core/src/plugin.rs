//! Plugin hook families and the build-level plugin host.
//!
//! There are two independent families:
//!
//! - [`ContentPlugin`]: document-level hooks (`before_build`,
//!   `transform_content`, `after_build`) run by the
//!   [`ContentPipeline`](crate::pipeline::ContentPipeline). Failures are
//!   isolated per plugin.
//! - [`BuildPlugin`]: build-level hooks (`on_build_start`, `on_vault_parsed`,
//!   `on_page_generated`, `on_build_end`) run by [`PluginHost`]. A failure
//!   aborts the build.
//!
//! Each plugin declares the hooks it implements through `hooks()`; hooks not
//! listed there are skipped without being called.

use crate::models::{Frontmatter, Page};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Document-level hooks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentHook {
    BeforeBuild,
    TransformContent,
    AfterBuild,
}

impl ContentHook {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentHook::BeforeBuild => "beforeBuild",
            ContentHook::TransformContent => "transformContent",
            ContentHook::AfterBuild => "afterBuild",
        }
    }
}

impl fmt::Display for ContentHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context for [`ContentPlugin::before_build`]
#[derive(Debug, Clone, Copy)]
pub struct BeforeBuildContext<'a> {
    /// The raw document, frontmatter included
    pub markdown: &'a str,
}

/// Context for [`ContentPlugin::after_build`]
#[derive(Debug, Clone, Copy)]
pub struct AfterBuildContext<'a> {
    pub content: &'a str,
    pub metadata: &'a Frontmatter,
}

/// A plugin that observes or rewrites a single document's transformation
pub trait ContentPlugin: Send + Sync {
    fn name(&self) -> &str {
        "anonymous"
    }

    /// Hooks this plugin implements
    fn hooks(&self) -> &[ContentHook];

    fn before_build(&self, _ctx: &BeforeBuildContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the replacement for `content`
    fn transform_content(&self, content: &str, _metadata: &Frontmatter) -> anyhow::Result<String> {
        Ok(content.to_string())
    }

    fn after_build(&self, _ctx: &AfterBuildContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn implements(&self, hook: ContentHook) -> bool {
        self.hooks().contains(&hook)
    }
}

type BeforeFn = Box<dyn Fn(&BeforeBuildContext<'_>) -> anyhow::Result<()> + Send + Sync>;
type TransformFn = Box<dyn Fn(&str, &Frontmatter) -> anyhow::Result<String> + Send + Sync>;
type AfterFn = Box<dyn Fn(&AfterBuildContext<'_>) -> anyhow::Result<()> + Send + Sync>;

/// A [`ContentPlugin`] assembled from closures; only the hooks given are
/// implemented.
///
/// ```
/// use nodig_core::plugin::{ContentPlugin, FnContentPlugin};
/// use nodig_core::transform_content;
///
/// let shout = FnContentPlugin::new("shout").on_transform_content(|c, _| Ok(c.to_uppercase()));
/// let plugins: Vec<Box<dyn ContentPlugin>> = vec![Box::new(shout)];
/// let page = transform_content("hello", &plugins);
/// assert_eq!(page.content, "HELLO");
/// ```
pub struct FnContentPlugin {
    name: String,
    hooks: Vec<ContentHook>,
    before: Option<BeforeFn>,
    transform: Option<TransformFn>,
    after: Option<AfterFn>,
}

impl FnContentPlugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hooks: Vec::new(),
            before: None,
            transform: None,
            after: None,
        }
    }

    pub fn on_before_build<F>(mut self, f: F) -> Self
    where
        F: Fn(&BeforeBuildContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.before = Some(Box::new(f));
        self.declare(ContentHook::BeforeBuild)
    }

    pub fn on_transform_content<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &Frontmatter) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(f));
        self.declare(ContentHook::TransformContent)
    }

    pub fn on_after_build<F>(mut self, f: F) -> Self
    where
        F: Fn(&AfterBuildContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.after = Some(Box::new(f));
        self.declare(ContentHook::AfterBuild)
    }

    fn declare(mut self, hook: ContentHook) -> Self {
        if !self.hooks.contains(&hook) {
            self.hooks.push(hook);
        }
        self
    }
}

impl ContentPlugin for FnContentPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn hooks(&self) -> &[ContentHook] {
        &self.hooks
    }

    fn before_build(&self, ctx: &BeforeBuildContext<'_>) -> anyhow::Result<()> {
        match &self.before {
            Some(f) => f(ctx),
            None => Ok(()),
        }
    }

    fn transform_content(&self, content: &str, metadata: &Frontmatter) -> anyhow::Result<String> {
        match &self.transform {
            Some(f) => f(content, metadata),
            None => Ok(content.to_string()),
        }
    }

    fn after_build(&self, ctx: &AfterBuildContext<'_>) -> anyhow::Result<()> {
        match &self.after {
            Some(f) => f(ctx),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Build-level hooks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildHook {
    BuildStart,
    VaultParsed,
    PageGenerated,
    BuildEnd,
}

impl BuildHook {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildHook::BuildStart => "onBuildStart",
            BuildHook::VaultParsed => "onVaultParsed",
            BuildHook::PageGenerated => "onPageGenerated",
            BuildHook::BuildEnd => "onBuildEnd",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown build hook: {0}")]
pub struct UnknownHook(pub String);

impl FromStr for BuildHook {
    type Err = UnknownHook;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "onBuildStart" => Ok(BuildHook::BuildStart),
            "onVaultParsed" => Ok(BuildHook::VaultParsed),
            "onPageGenerated" => Ok(BuildHook::PageGenerated),
            "onBuildEnd" => Ok(BuildHook::BuildEnd),
            other => Err(UnknownHook(other.to_string())),
        }
    }
}

impl fmt::Display for BuildHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStartContext {
    pub vault: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEndContext {
    /// Number of pages handed to the renderer
    pub pages: usize,
    pub output: PathBuf,
}

/// The argument of one build-level hook call; selects which hook runs
#[derive(Debug, Clone, Copy)]
pub enum HookContext<'a> {
    BuildStart(&'a BuildStartContext),
    VaultParsed { pages: &'a [Page] },
    PageGenerated { page: &'a Page },
    BuildEnd(&'a BuildEndContext),
}

impl HookContext<'_> {
    pub fn hook(&self) -> BuildHook {
        match self {
            HookContext::BuildStart(_) => BuildHook::BuildStart,
            HookContext::VaultParsed { .. } => BuildHook::VaultParsed,
            HookContext::PageGenerated { .. } => BuildHook::PageGenerated,
            HookContext::BuildEnd(_) => BuildHook::BuildEnd,
        }
    }
}

/// A plugin observing a whole build
#[async_trait]
pub trait BuildPlugin: Send + Sync {
    fn name(&self) -> &str;

    /// Hooks this plugin implements
    fn hooks(&self) -> &[BuildHook];

    async fn on_build_start(&self, _ctx: &BuildStartContext) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_vault_parsed(&self, _pages: &[Page]) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called once per page, after its content has been transformed
    async fn on_page_generated(&self, _page: &Page) -> anyhow::Result<()> {
        Ok(())
    }

    async fn on_build_end(&self, _ctx: &BuildEndContext) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Plugin '{plugin}' failed in {hook}: {source}")]
    Hook {
        plugin: String,
        hook: BuildHook,
        #[source]
        source: anyhow::Error,
    },
}

/// Ordered list of build plugins for one build
#[derive(Default)]
pub struct PluginHost {
    plugins: Vec<Box<dyn BuildPlugin>>,
}

impl PluginHost {
    pub fn new(plugins: Vec<Box<dyn BuildPlugin>>) -> Self {
        Self { plugins }
    }

    pub fn push(&mut self, plugin: Box<dyn BuildPlugin>) {
        self.plugins.push(plugin);
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run one hook on every plugin that implements it, in list order.
    ///
    /// Each call is awaited before the next plugin starts. The first failure
    /// stops the run and is returned.
    pub async fn run_hook(&self, ctx: HookContext<'_>) -> Result<(), PluginError> {
        let hook = ctx.hook();

        for plugin in &self.plugins {
            if !plugin.hooks().contains(&hook) {
                tracing::debug!("Plugin '{}' has no {} hook", plugin.name(), hook);
                continue;
            }

            let result = match ctx {
                HookContext::BuildStart(c) => plugin.on_build_start(c).await,
                HookContext::VaultParsed { pages } => plugin.on_vault_parsed(pages).await,
                HookContext::PageGenerated { page } => plugin.on_page_generated(page).await,
                HookContext::BuildEnd(c) => plugin.on_build_end(c).await,
            };

            result.map_err(|source| PluginError::Hook {
                plugin: plugin.name().to_string(),
                hook,
                source,
            })?;
        }

        Ok(())
    }
}
