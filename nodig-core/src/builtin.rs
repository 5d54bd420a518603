//! Build plugins shipped with nodig, resolvable by name from configuration.

use crate::config::ConfigError;
use crate::models::Page;
use crate::plugin::{BuildEndContext, BuildHook, BuildPlugin, BuildStartContext, PluginHost};
use async_trait::async_trait;

/// Names accepted in the `plugins` config list
pub const BUILTIN_PLUGINS: &[&str] = &["trace"];

/// Look up a built-in build plugin by name
pub fn build_plugin(name: &str) -> Option<Box<dyn BuildPlugin>> {
    match name {
        "trace" => Some(Box::new(TraceHooks)),
        _ => None,
    }
}

/// Build a plugin host from configured names, preserving their order
pub fn plugin_host(names: &[String]) -> Result<PluginHost, ConfigError> {
    let plugins = names
        .iter()
        .map(|name| build_plugin(name).ok_or_else(|| ConfigError::UnknownPlugin(name.clone())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PluginHost::new(plugins))
}

/// Logs every build-level hook
pub struct TraceHooks;

const ALL_HOOKS: &[BuildHook] = &[
    BuildHook::BuildStart,
    BuildHook::VaultParsed,
    BuildHook::PageGenerated,
    BuildHook::BuildEnd,
];

#[async_trait]
impl BuildPlugin for TraceHooks {
    fn name(&self) -> &str {
        "trace"
    }

    fn hooks(&self) -> &[BuildHook] {
        ALL_HOOKS
    }

    async fn on_build_start(&self, ctx: &BuildStartContext) -> anyhow::Result<()> {
        tracing::info!("Build started: {:?} -> {:?}", ctx.vault, ctx.output);
        Ok(())
    }

    async fn on_vault_parsed(&self, pages: &[Page]) -> anyhow::Result<()> {
        tracing::info!("Vault parsed: {} pages", pages.len());
        Ok(())
    }

    async fn on_page_generated(&self, page: &Page) -> anyhow::Result<()> {
        tracing::info!("Page generated: {} ({})", page.url, page.path);
        Ok(())
    }

    async fn on_build_end(&self, ctx: &BuildEndContext) -> anyhow::Result<()> {
        tracing::info!("Build finished: {} pages in {:?}", ctx.pages, ctx.output);
        Ok(())
    }
}
