//! Core domain types shared by the browser, scheduler, and assembler.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FileDescriptor
// ---------------------------------------------------------------------------

/// A markdown file's location within one repository snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Repository-relative path (e.g. `guides/01_getting-started/01_quickstart.md`).
    pub path: String,
}

impl FileDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

// ---------------------------------------------------------------------------
// RepoSnapshot
// ---------------------------------------------------------------------------

/// The markdown files found under the guides directory of one branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSnapshot {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch the listing was taken from (the default branch).
    pub branch: String,
    /// Git tree identifier the listing was read from.
    pub tree_sha: String,
    /// Matching files, in the order the provider listed them.
    pub files: Vec<FileDescriptor>,
    /// The provider cut the tree listing short.
    #[serde(default)]
    pub truncated: bool,
}

// ---------------------------------------------------------------------------
// FileRecord
// ---------------------------------------------------------------------------

/// One downloaded file, split and ordered, ready for assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    /// Repository-relative path.
    pub path: String,
    /// Full downloaded text, frontmatter included.
    pub raw_content: String,
    /// Text after the frontmatter block (or the full text if there is none).
    pub body: String,
    /// Resolved order, `None` when neither metadata nor filename gave one.
    pub order_value: Option<f64>,
}
