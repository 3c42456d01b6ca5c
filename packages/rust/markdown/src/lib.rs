//! Markdown document handling for gradio-md.
//!
//! Guides carry an optional YAML-style frontmatter block. We never interpret
//! the markdown itself; we only separate that block from the body and read
//! its flat key/value pairs for ordering hints.

mod frontmatter;

pub use frontmatter::{FrontmatterData, Split, parse_frontmatter, split_frontmatter};
