//! Single-document transformation pipeline
//!
//! Flow: beforeBuild → frontmatter → link resolution → transformContent* → afterBuild
//!
//! Document-level plugin failures are isolated: a hook that errors or panics
//! is logged, recorded as a [`Diagnostic`], and the pipeline carries on with
//! the content it had before that hook ran.

use crate::frontmatter::parse_frontmatter;
use crate::markdown::resolve_links;
use crate::models::{Diagnostic, FrontmatterDecode, TransformedPage};
use crate::plugin::{AfterBuildContext, BeforeBuildContext, ContentHook, ContentPlugin};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Run the pipeline over `markdown` with the given plugins, in list order
pub fn transform_content(markdown: &str, plugins: &[Box<dyn ContentPlugin>]) -> TransformedPage {
    let mut diagnostics = Vec::new();

    let before = BeforeBuildContext { markdown };
    for plugin in plugins_with(plugins, ContentHook::BeforeBuild) {
        if let Err(d) =
            run_isolated(plugin, ContentHook::BeforeBuild, || plugin.before_build(&before))
        {
            diagnostics.push(d);
        }
    }

    let parsed = parse_frontmatter(markdown);
    if parsed.decode == FrontmatterDecode::Fallback {
        diagnostics.push(Diagnostic::warning(
            "frontmatter.fallback",
            "Frontmatter is not valid YAML; decoded line by line",
        ));
    }

    let metadata = parsed.frontmatter;
    let mut content = resolve_links(&parsed.content);

    for plugin in plugins_with(plugins, ContentHook::TransformContent) {
        match run_isolated(plugin, ContentHook::TransformContent, || {
            plugin.transform_content(&content, &metadata)
        }) {
            Ok(next) => content = next,
            Err(d) => diagnostics.push(d),
        }
    }

    let after = AfterBuildContext {
        content: &content,
        metadata: &metadata,
    };
    for plugin in plugins_with(plugins, ContentHook::AfterBuild) {
        if let Err(d) =
            run_isolated(plugin, ContentHook::AfterBuild, || plugin.after_build(&after))
        {
            diagnostics.push(d);
        }
    }

    TransformedPage {
        frontmatter: metadata,
        content,
        diagnostics,
    }
}

fn plugins_with(
    plugins: &[Box<dyn ContentPlugin>],
    hook: ContentHook,
) -> impl Iterator<Item = &dyn ContentPlugin> {
    plugins
        .iter()
        .map(|p| p.as_ref())
        .filter(move |p| p.implements(hook))
}

/// Call one hook, turning an error or a panic into a diagnostic
fn run_isolated<T>(
    plugin: &dyn ContentPlugin,
    hook: ContentHook,
    call: impl FnOnce() -> anyhow::Result<T>,
) -> Result<T, Diagnostic> {
    let message = match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(e)) => format!("{e:#}"),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            format!("panicked: {reason}")
        }
    };

    tracing::warn!("Plugin '{}' failed in {}: {}", plugin.name(), hook, message);
    Err(Diagnostic {
        plugin: Some(plugin.name().to_string()),
        ..Diagnostic::warning(format!("plugin.{hook}"), message)
    })
}

/// Owns an ordered list of document-level plugins
#[derive(Default)]
pub struct ContentPipeline {
    plugins: Vec<Box<dyn ContentPlugin>>,
}

impl ContentPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plugins(plugins: Vec<Box<dyn ContentPlugin>>) -> Self {
        Self { plugins }
    }

    pub fn push(&mut self, plugin: Box<dyn ContentPlugin>) {
        self.plugins.push(plugin);
    }

    pub fn plugins(&self) -> &[Box<dyn ContentPlugin>] {
        &self.plugins
    }

    pub fn transform(&self, markdown: &str) -> TransformedPage {
        transform_content(markdown, &self.plugins)
    }
}
