//! Text-level transforms over frontmatter-stripped markdown bodies.

pub mod tags;
pub mod wikilinks;

pub use tags::extract_tags;
pub use wikilinks::{outgoing_links, resolve_links, scan, Segment};
