//! Transform command: run a single file through the document pipeline.

use anyhow::{Context, Result};
use nodig_core::{transform_content, Frontmatter};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Serialize)]
struct TransformOutput<'a> {
    frontmatter: &'a Frontmatter,
    content: &'a str,
}

pub fn transform_file(file: &Path) -> Result<()> {
    let markdown =
        fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))?;

    let page = transform_content(&markdown, &[]);
    for diagnostic in &page.diagnostics {
        tracing::warn!("[{}] {}", diagnostic.code, diagnostic.message);
    }

    let output = TransformOutput {
        frontmatter: &page.frontmatter,
        content: &page.content,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
