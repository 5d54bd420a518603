//! # nodig-core
//!
//! Core library for the nodig vault pipeline.
//!
//! This crate turns an Obsidian-style vault of markdown notes into a site
//! model: parsed frontmatter, resolved wikilinks, tags, backlinks and a
//! navigation tree, with plugin hooks at the document and build levels.

pub mod backlinks;
pub mod builder;
pub mod builtin;
pub mod config;
pub mod frontmatter;
pub mod markdown;
pub mod models;
pub mod navigation;
pub mod pipeline;
pub mod plugin;
pub mod render;
pub mod slug;
pub mod vault;

pub use backlinks::{extract_backlinks, BacklinkIndex};
pub use builder::{BuildError, BuildSummary, SiteBuilder};
pub use config::{BacklinkKeys, Config, ConfigError};
pub use frontmatter::parse_frontmatter;
pub use markdown::{extract_tags, outgoing_links, resolve_links};
pub use models::{
    Diagnostic, DiagnosticSeverity, Document, Frontmatter, FrontmatterDecode, NavNode, Page,
    ParsedDocument, SiteModel, TransformedPage,
};
pub use navigation::build_navigation_tree;
pub use pipeline::{transform_content, ContentPipeline};
pub use plugin::{
    BuildHook, BuildPlugin, ContentHook, ContentPlugin, HookContext, PluginHost, UnknownHook,
};
pub use render::{JsonSiteWriter, SiteRenderer};
pub use slug::{slugify, url_from_path};
pub use vault::{load_vault, url_collisions, VaultError, VaultLoader};
