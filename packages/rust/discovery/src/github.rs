//! GitHub-backed repository browser.
//!
//! Three API calls produce a snapshot: repository metadata (default branch),
//! branch metadata (tree SHA), and the recursive tree listing. File contents
//! come from the raw content host, one GET per file.

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use gradiomd_crawler::Transport;
use gradiomd_shared::{
    FileDescriptor, GradioMdError, RepoSnapshot, RepositoryConfig, Result,
};

use crate::{RepositoryBrowser, is_guide_file};

// ---------------------------------------------------------------------------
// API response shapes (only the fields we read)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RepoInfo {
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BranchInfo {
    commit: Option<BranchCommit>,
}

#[derive(Debug, Deserialize)]
struct BranchCommit {
    commit: Option<CommitDetail>,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    tree: Option<TreeRef>,
}

#[derive(Debug, Deserialize)]
struct TreeRef {
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TreeListing {
    #[serde(default)]
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

// ---------------------------------------------------------------------------
// GitHubBrowser
// ---------------------------------------------------------------------------

/// Lists and downloads guide files from one GitHub repository.
#[derive(Debug, Clone)]
pub struct GitHubBrowser {
    transport: Transport,
    repository: RepositoryConfig,
    api_base: Url,
    raw_base: Url,
}

impl GitHubBrowser {
    /// Create a browser; fails if the configured base URLs are unusable.
    pub fn new(transport: Transport, repository: &RepositoryConfig) -> Result<Self> {
        Ok(Self {
            transport,
            api_base: repository.api_base()?,
            raw_base: repository.raw_base()?,
            repository: repository.clone(),
        })
    }

    fn repo_endpoint(&self, rest: &[&str]) -> Result<Url> {
        let mut segments = vec!["repos", self.repository.owner.as_str(), self.repository.name.as_str()];
        segments.extend_from_slice(rest);
        join_segments(&self.api_base, &segments)
    }

    async fn default_branch(&self) -> Result<String> {
        let url = self.repo_endpoint(&[])?;
        let info: RepoInfo = self.transport.get_json(&url).await?;
        info.default_branch
            .filter(|b| !b.is_empty())
            .ok_or_else(|| GradioMdError::discovery("Unable to determine default branch."))
    }

    async fn tree_sha(&self, branch: &str) -> Result<String> {
        let url = self.repo_endpoint(&["branches", branch])?;
        let info: BranchInfo = self.transport.get_json(&url).await?;
        info.commit
            .and_then(|c| c.commit)
            .and_then(|c| c.tree)
            .and_then(|t| t.sha)
            .filter(|sha| !sha.is_empty())
            .ok_or_else(|| GradioMdError::discovery("Unable to resolve tree SHA for branch."))
    }

    async fn tree(&self, tree_sha: &str) -> Result<TreeListing> {
        let mut url = self.repo_endpoint(&["git", "trees", tree_sha])?;
        url.query_pairs_mut().append_pair("recursive", "1");
        self.transport.get_json(&url).await
    }

    /// Raw content URL for `path` on `branch`.
    ///
    /// Branch and path are split on `/` so names like `release/4.0` keep their
    /// slashes, as the raw host expects.
    pub fn raw_url(&self, branch: &str, path: &str) -> Result<Url> {
        let mut segments = vec![self.repository.owner.as_str(), self.repository.name.as_str()];
        segments.extend(branch.split('/'));
        segments.extend(path.split('/'));
        join_segments(&self.raw_base, &segments)
    }
}

impl RepositoryBrowser for GitHubBrowser {
    #[instrument(skip_all, fields(owner = %self.repository.owner, repo = %self.repository.name))]
    async fn snapshot(&self) -> Result<RepoSnapshot> {
        let owner = &self.repository.owner;
        let repo = &self.repository.name;

        info!("fetching repository metadata for {owner}/{repo}");
        let branch = self.default_branch().await?;

        info!(%branch, "resolving tree for branch");
        let tree_sha = self.tree_sha(&branch).await?;

        let listing = self.tree(&tree_sha).await?;
        if listing.truncated {
            warn!("git tree response truncated, results may be incomplete");
        }

        let guides_dir = self.repository.guides_dir();
        let files: Vec<FileDescriptor> = listing
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "blob")
            .filter(|entry| is_guide_file(&entry.path, guides_dir, &self.repository.extensions))
            .map(|entry| FileDescriptor::new(entry.path))
            .collect();

        debug!(%tree_sha, files = files.len(), "tree listing filtered");

        Ok(RepoSnapshot {
            owner: owner.clone(),
            repo: repo.clone(),
            branch,
            tree_sha,
            files,
            truncated: listing.truncated,
        })
    }

    async fn fetch_file(&self, snapshot: &RepoSnapshot, file: &FileDescriptor) -> Result<String> {
        let url = self.raw_url(&snapshot.branch, &file.path)?;
        debug!(path = %file.path, %url, "downloading file");
        self.transport.get_text(&url).await
    }
}

/// Append percent-encoded path segments to `base`.
fn join_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GradioMdError::config(format!("{base} cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
