//! End-to-end run: snapshot → concurrent download → order → assemble → write.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use gradiomd_crawler::map_with_concurrency;
use gradiomd_discovery::RepositoryBrowser;
use gradiomd_markdown::{parse_frontmatter, split_frontmatter};
use gradiomd_shared::{AppConfig, FileDescriptor, FileRecord, GradioMdError, RepoSnapshot, Result};

use crate::assembler::{AssembleOptions, assemble};
use crate::order::resolve_order;
use crate::output::write_output;

/// Summary of a successful run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Where the document was written.
    pub output_path: PathBuf,
    /// Number of guides included.
    pub file_count: usize,
    /// Branch the guides were read from.
    pub branch: String,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each file download completes (in completion order).
    fn file_fetched(&self, path: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &RunResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_fetched(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &RunResult) {}
}

/// Split a downloaded file and resolve its order value.
pub fn build_record(path: String, raw_content: String, order_keys: &[String]) -> FileRecord {
    let split = split_frontmatter(&raw_content);
    let frontmatter = parse_frontmatter(split.frontmatter);
    let order_value = resolve_order(&frontmatter, &path, order_keys);
    let body = split.body.to_string();

    FileRecord {
        path,
        raw_content,
        body,
        order_value,
    }
}

/// Download every file in `snapshot` with at most `concurrency` requests in
/// flight. Records come back in listing order; the first failure aborts.
pub async fn fetch_records<B>(
    browser: Arc<B>,
    snapshot: Arc<RepoSnapshot>,
    concurrency: usize,
    order_keys: Arc<[String]>,
    progress: Arc<dyn ProgressReporter>,
) -> Result<Vec<FileRecord>>
where
    B: RepositoryBrowser + 'static,
{
    let total = snapshot.files.len();
    let completed = Arc::new(AtomicUsize::new(0));
    let files = snapshot.files.clone();

    map_with_concurrency(files, concurrency, move |file: FileDescriptor| {
        let browser = Arc::clone(&browser);
        let snapshot = Arc::clone(&snapshot);
        let order_keys = Arc::clone(&order_keys);
        let progress = Arc::clone(&progress);
        let completed = Arc::clone(&completed);
        async move {
            let raw = browser.fetch_file(&snapshot, &file).await?;
            let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
            progress.file_fetched(&file.path, current, total);
            debug!(path = %file.path, current, total, "fetched guide");
            Ok::<_, GradioMdError>(build_record(file.path, raw, &order_keys))
        }
    })
    .await
}

/// Run the whole aggregation and write the document to `output_path`.
///
/// Nothing is written unless every step succeeds.
#[instrument(skip_all, fields(output = %output_path.display()))]
pub async fn run<B>(
    config: &AppConfig,
    browser: Arc<B>,
    output_path: &Path,
    progress: Arc<dyn ProgressReporter>,
) -> Result<RunResult>
where
    B: RepositoryBrowser + 'static,
{
    let start = Instant::now();

    progress.phase("Listing repository files");
    let snapshot = browser.snapshot().await?;

    if snapshot.files.is_empty() {
        return Err(GradioMdError::discovery(format!(
            "No markdown files found under {}/.",
            config.repository.guides_dir()
        )));
    }

    let branch = snapshot.branch.clone();
    let total = snapshot.files.len();
    info!(files = total, %branch, "found markdown files, downloading");

    progress.phase("Downloading guides");
    let records = fetch_records(
        browser,
        Arc::new(snapshot),
        config.fetch.concurrency,
        config.ordering.order_keys.clone().into(),
        Arc::clone(&progress),
    )
    .await?;

    progress.phase("Assembling document");
    let document = assemble(&records, &AssembleOptions::from(&config.output));

    progress.phase("Writing output");
    write_output(output_path, &document)?;

    let result = RunResult {
        output_path: output_path.to_path_buf(),
        file_count: records.len(),
        branch,
        elapsed: start.elapsed(),
    };

    info!(
        files = result.file_count,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "document written"
    );
    progress.done(&result);

    Ok(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
