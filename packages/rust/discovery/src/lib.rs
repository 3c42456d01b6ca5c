//! Repository browsing: which markdown files exist, and what they contain.
//!
//! The pipeline only talks to a [`RepositoryBrowser`]. [`GitHubBrowser`] is the
//! production implementation backed by the GitHub REST API and
//! `raw.githubusercontent.com`; tests substitute an in-memory browser.

mod github;

use std::future::Future;

use gradiomd_shared::{FileDescriptor, RepoSnapshot, Result};

pub use github::GitHubBrowser;

/// Source of the file listing and file contents for one run.
pub trait RepositoryBrowser: Send + Sync {
    /// Resolve the default branch and list the markdown files under the guides path.
    ///
    /// An empty listing is not an error here; the caller decides.
    fn snapshot(&self) -> impl Future<Output = Result<RepoSnapshot>> + Send;

    /// Download one file's raw text from the snapshot's branch.
    fn fetch_file(
        &self,
        snapshot: &RepoSnapshot,
        file: &FileDescriptor,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Whether `path` is a markdown file inside `guides_dir`.
///
/// `guides_dir` is given without surrounding slashes; matching is by prefix
/// `"{guides_dir}/"` and by exact (case-sensitive) suffix.
pub fn is_guide_file(path: &str, guides_dir: &str, extensions: &[String]) -> bool {
    let in_dir = path
        .strip_prefix(guides_dir)
        .is_some_and(|rest| rest.starts_with('/'));
    in_dir && extensions.iter().any(|ext| path.ends_with(ext.as_str()))
}
