//! # nodig CLI
//!
//! Command-line interface for the nodig vault pipeline.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nodig")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "nodig.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site model from a vault
    Build {
        /// Vault directory (overrides paths.vault)
        #[arg(long)]
        vault: Option<PathBuf>,

        /// Output directory (overrides paths.output)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run the document pipeline over one markdown file and print JSON
    Transform {
        /// Markdown file to transform
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine readable
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Build { vault, output } => {
            let opts = commands::BuildOptions { vault, output };
            commands::build_site(&cli.config, opts).await
        }
        Commands::Transform { file } => commands::transform_file(&file),
    }
}
