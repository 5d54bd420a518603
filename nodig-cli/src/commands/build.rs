//! Build command implementation.

use anyhow::{Context, Result};
use nodig_core::builtin::plugin_host;
use nodig_core::{Config, JsonSiteWriter, SiteBuilder};
use std::path::{Path, PathBuf};

/// Command-line overrides for config paths
#[derive(Debug, Default)]
pub struct BuildOptions {
    pub vault: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Build the vault and write the site model as JSON
pub async fn build_site(config_path: &Path, opts: BuildOptions) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let mut config = Config::load_or_default(config_path).context("Failed to load configuration")?;

    // Overrides are relative to where the command runs, not to the config file
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    if let Some(vault) = opts.vault {
        config = config.with_vault(cwd.join(vault));
    }
    if let Some(output) = opts.output {
        config = config.with_output(cwd.join(output));
    }

    let host = plugin_host(&config.plugins).context("Failed to set up plugins")?;
    let builder = SiteBuilder::new(config);
    let summary = builder
        .build(&host, &JsonSiteWriter::new())
        .await
        .context("Failed to build site")?;

    for diagnostic in &summary.diagnostics {
        tracing::warn!(
            "{}: [{}] {}",
            diagnostic.source_path.as_deref().unwrap_or("<unknown>"),
            diagnostic.code,
            diagnostic.message
        );
    }

    println!(
        "Built {} pages into {}",
        summary.site.pages.len(),
        summary.output.display()
    );
    Ok(())
}
