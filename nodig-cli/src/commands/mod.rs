//! CLI command implementations.

pub mod build;
pub mod transform;

pub use build::{build_site, BuildOptions};
pub use transform::transform_file;
