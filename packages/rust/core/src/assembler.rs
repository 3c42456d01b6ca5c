//! Document assembly: order the downloaded guides and join them into one
//! markdown document.
//!
//! Ordering is total and deterministic. Files with an order value come first,
//! ascending; files without one follow. Ties break on the natural,
//! case-insensitive order of their paths.

use std::cmp::Ordering;

use gradiomd_shared::{FileRecord, OutputConfig};

use crate::natural::path_cmp;

/// Text placed between consecutive sections.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Rendering switches for [`assemble`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Emit the body without its frontmatter block (otherwise the raw text).
    pub strip_frontmatter: bool,
    /// Prefix each section with `<!-- Source: {path} -->`.
    pub include_source_notes: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            strip_frontmatter: true,
            include_source_notes: true,
        }
    }
}

impl From<&OutputConfig> for AssembleOptions {
    fn from(config: &OutputConfig) -> Self {
        Self {
            strip_frontmatter: config.strip_frontmatter,
            include_source_notes: config.include_source_notes,
        }
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Sort key of one record: order value (missing sorts as +infinity), then path.
#[derive(Debug, Clone, Copy)]
pub struct SortKey<'a> {
    pub order: f64,
    pub path: &'a str,
}

impl<'a> SortKey<'a> {
    pub fn of(record: &'a FileRecord) -> Self {
        Self {
            order: record.order_value.unwrap_or(f64::INFINITY),
            path: &record.path,
        }
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        // Order values are finite or +inf, so partial_cmp never yields None.
        self.order
            .partial_cmp(&other.order)
            .unwrap_or(Ordering::Equal)
            .then_with(|| path_cmp(self.path, other.path))
    }
}

/// Records in assembly order. The input slice is left untouched.
pub fn sort_records(records: &[FileRecord]) -> Vec<&FileRecord> {
    let mut sorted: Vec<&FileRecord> = records.iter().collect();
    sorted.sort_by(|a, b| SortKey::of(a).compare(&SortKey::of(b)));
    sorted
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Build the combined document.
///
/// Each section is the record's body (or raw text) with trailing whitespace
/// trimmed. The result always ends with exactly one newline.
pub fn assemble(records: &[FileRecord], options: &AssembleOptions) -> String {
    let sections: Vec<String> = sort_records(records)
        .into_iter()
        .map(|record| render_section(record, options))
        .collect();

    let mut document = sections.join(SECTION_SEPARATOR);
    document.push('\n');
    document
}

fn render_section(record: &FileRecord, options: &AssembleOptions) -> String {
    let text = if options.strip_frontmatter {
        &record.body
    } else {
        &record.raw_content
    };
    let text = text.trim_end();

    if options.include_source_notes {
        format!("<!-- Source: {} -->\n{text}", record.path)
    } else {
        text.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
